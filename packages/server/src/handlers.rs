//! HTTP handler functions for the rent scout API.

use actix_web::{HttpResponse, web};
use rent_scout_models::ScoreWeights;
use rent_scout_server_models::{
    ApiCountyStats, ApiHealth, ApiNeighborhood, NeighborhoodQueryParams, ScoreRequest,
};

use crate::AppState;

/// Default rent budget when the query omits `maxRent`.
const DEFAULT_MAX_RENT: f64 = 3000.0;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/neighborhoods`
///
/// Ranked listing filtered by county and maximum rent.
pub async fn neighborhoods(
    state: web::Data<AppState>,
    params: web::Query<NeighborhoodQueryParams>,
) -> HttpResponse {
    let max_rent = params.max_rent.unwrap_or(DEFAULT_MAX_RENT);

    let conn = match state.conn.lock() {
        Ok(conn) => conn,
        Err(_) => return store_unavailable(),
    };

    match rent_scout_database::query_filtered(&conn, params.county.as_deref(), max_rent) {
        Ok(rows) => {
            let listing: Vec<ApiNeighborhood> =
                rows.into_iter().map(ApiNeighborhood::from).collect();
            HttpResponse::Ok().json(listing)
        }
        Err(e) => {
            log::error!("Failed to query neighborhoods: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query neighborhoods"
            }))
        }
    }
}

/// `GET /api/counties`
///
/// Per-county aggregates over the ranked table.
pub async fn counties(state: web::Data<AppState>) -> HttpResponse {
    let conn = match state.conn.lock() {
        Ok(conn) => conn,
        Err(_) => return store_unavailable(),
    };

    match rent_scout_database::county_stats(&conn) {
        Ok(stats) => {
            let stats: Vec<ApiCountyStats> = stats.into_iter().map(ApiCountyStats::from).collect();
            HttpResponse::Ok().json(stats)
        }
        Err(e) => {
            log::error!("Failed to aggregate counties: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to aggregate counties"
            }))
        }
    }
}

/// `GET /api/indicators`
///
/// Economic indicators fetched at startup. Fields are null when FRED
/// enrichment is disabled or failed.
pub async fn indicators(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.indicators)
}

/// `POST /api/score`
///
/// Applies a new weight triple: re-scores the base records, replaces the
/// store, and returns the full ranked listing.
pub async fn apply_weights(
    state: web::Data<AppState>,
    body: web::Json<ScoreRequest>,
) -> HttpResponse {
    let weights = ScoreWeights {
        affordability: body.affordability,
        amenities: body.amenities,
        safety: body.safety,
    };

    let scored = rent_scout_scoring::score(state.base_records.clone(), weights);

    let conn = match state.conn.lock() {
        Ok(conn) => conn,
        Err(_) => return store_unavailable(),
    };

    if let Err(e) = rent_scout_database::replace_all(&conn, &scored) {
        log::error!("Failed to store scored records: {e}");
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to store scored records"
        }));
    }

    let listing: Vec<ApiNeighborhood> = scored.into_iter().map(ApiNeighborhood::from).collect();
    HttpResponse::Ok().json(listing)
}

fn store_unavailable() -> HttpResponse {
    log::error!("Store mutex poisoned");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Store unavailable"
    }))
}
