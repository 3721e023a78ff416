#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the rent scout dashboard.
//!
//! Serves the presentation-layer contract: the ranked neighborhood
//! listing (filtered by county and rent budget), per-county aggregates,
//! economic indicators, and weight application. The dashboard frontend
//! renders from these endpoints; no widgets are rendered here.
//!
//! The merged and enriched base records are loaded once at startup; each
//! `POST /api/score` re-runs the pure scoring engine over them and
//! replaces the store wholesale.

mod handlers;

use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use rent_scout_models::{AnalyzerConfig, EconomicIndicators, NeighborhoodRecord, ScoreWeights};

/// Shared application state.
pub struct AppState {
    /// Merged + enriched records, unscored. Cloned per scoring pass.
    pub base_records: Vec<NeighborhoodRecord>,
    /// Ranked store connection. The `DuckDB` connection is not `Sync`,
    /// and there is exactly one writer, so a plain mutex is enough.
    pub conn: Mutex<rent_scout_database::Connection>,
    /// Indicators fetched once at startup (empty when FRED is disabled).
    pub indicators: EconomicIndicators,
}

/// Loads the dataset, enriches it, scores it with the default weights,
/// fills the store, and serves the API on `bind_addr:port`.
///
/// # Errors
///
/// Returns an error if a source file is missing (fatal per the data
/// contract), the store cannot be opened, or the bind fails. Enrichment
/// failures are not errors; they leave fallback constants in place.
pub async fn run(
    config: AnalyzerConfig,
    bind_addr: String,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = rent_scout_dataset::load_merged(&config)?;

    let enricher = rent_scout_enrich::from_config(&config);
    let incomes = enricher.county_incomes().await;
    let populations = enricher.county_populations().await;
    let indicators = enricher.economic_indicators().await;
    rent_scout_enrich::apply_enrichment(&mut records, &incomes, &populations);

    let scored = rent_scout_scoring::score(records.clone(), ScoreWeights::default());

    let conn = rent_scout_database::open(&config.db_path)?;
    rent_scout_database::replace_all(&conn, &scored)?;

    let state = web::Data::new(AppState {
        base_records: records,
        conn: Mutex::new(conn),
        indicators,
    });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/neighborhoods", web::get().to(handlers::neighborhoods))
                    .route("/counties", web::get().to(handlers::counties))
                    .route("/indicators", web::get().to(handlers::indicators))
                    .route("/score", web::post().to(handlers::apply_weights)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
