#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bulk amenity count refresh from the Overpass API.
//!
//! Offline tool, separate from the scoring pipeline: for every
//! neighborhood with coordinates it runs three Overpass count queries
//! (restaurants, shops of any kind, supermarkets within 1 km) and
//! rewrites `amenities.csv`. The public Overpass instance is shared
//! infrastructure, so calls are paced with a fixed 1-second pause per
//! neighborhood.
//!
//! A failed query keeps the neighborhood's previous counts; rent and
//! crime data are never touched.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rent_scout_models::NeighborhoodRecord;
use serde::Serialize;
use thiserror::Error;

/// Search radius around each neighborhood center, in meters.
const RADIUS_M: u32 = 1000;

/// Pause between neighborhoods (Overpass fair-use pacing).
const PAUSE: Duration = Duration::from_secs(1);

/// Per-query timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the amenity refresh tool.
#[derive(Debug, Error)]
pub enum AmenityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One output row of `amenities.csv`.
#[derive(Debug, Clone, Serialize)]
pub struct AmenityCounts {
    /// Neighborhood name, matching the rent source.
    pub name: String,
    /// Restaurants within [`RADIUS_M`].
    pub restaurant_count: i64,
    /// Shops of any kind within [`RADIUS_M`].
    pub shop_count: i64,
    /// Supermarkets within [`RADIUS_M`].
    pub grocery_count: i64,
    /// Sum of the three counts.
    pub total_amenities: i64,
}

/// Refreshes amenity counts for all records with coordinates and writes
/// the result to `output_path`.
///
/// Records without coordinates, and records whose queries fail, keep the
/// counts they already carry.
///
/// # Errors
///
/// Returns [`AmenityError`] only for the final CSV write; individual
/// Overpass failures are logged and skipped.
pub async fn refresh_amenities(
    overpass_url: &str,
    records: &[NeighborhoodRecord],
    output_path: &Path,
) -> Result<(), AmenityError> {
    let client = reqwest::Client::new();
    let bar = ProgressBar::new(records.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  {msg} {wide_bar:.cyan/dim} {pos}/{len} [{eta}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar.set_message("Fetching amenity counts");

    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        bar.inc(1);

        let counts = match (record.latitude, record.longitude) {
            (Some(lat), Some(lon)) => {
                let fetched = fetch_counts(&client, overpass_url, lat, lon).await;
                tokio::time::sleep(PAUSE).await;
                fetched
            }
            _ => {
                log::warn!("No coordinates for {}; keeping existing counts", record.name);
                None
            }
        };

        let (restaurants, shops, groceries) = counts.unwrap_or((
            record.restaurant_count,
            record.shop_count,
            record.grocery_count,
        ));

        rows.push(AmenityCounts {
            name: record.name.clone(),
            restaurant_count: restaurants,
            shop_count: shops,
            grocery_count: groceries,
            total_amenities: restaurants + shops + groceries,
        });
    }

    bar.finish_with_message("Amenity refresh complete");
    write_csv(&rows, output_path)?;
    log::info!("Wrote {} amenity rows to {}", rows.len(), output_path.display());

    Ok(())
}

/// Runs the three count queries for one coordinate pair.
///
/// Returns `None` if any of the three fails, so partial counts never mix
/// with stale ones.
async fn fetch_counts(
    client: &reqwest::Client,
    overpass_url: &str,
    lat: f64,
    lon: f64,
) -> Option<(i64, i64, i64)> {
    let restaurants =
        count_query(client, overpass_url, &selector("\"amenity\"=\"restaurant\"", lat, lon)).await?;
    let shops = count_query(client, overpass_url, &selector("\"shop\"", lat, lon)).await?;
    let groceries =
        count_query(client, overpass_url, &selector("\"shop\"=\"supermarket\"", lat, lon)).await?;

    Some((restaurants, shops, groceries))
}

/// Builds an Overpass QL count query for one tag selector.
fn selector(tag: &str, lat: f64, lon: f64) -> String {
    format!(
        "[out:json][timeout:25];\n(\n  node[{tag}](around:{RADIUS_M},{lat},{lon});\n  way[{tag}](around:{RADIUS_M},{lat},{lon});\n);\nout count;"
    )
}

/// Executes one count query, returning `None` on any failure.
async fn count_query(client: &reqwest::Client, overpass_url: &str, query: &str) -> Option<i64> {
    let resp = client
        .get(overpass_url)
        .query(&[("data", query)])
        .timeout(TIMEOUT)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status);

    let resp = match resp {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("Overpass query failed: {e}");
            return None;
        }
    };

    match resp.json::<serde_json::Value>().await {
        Ok(body) => parse_count(&body),
        Err(e) => {
            log::warn!("Overpass response was not JSON: {e}");
            None
        }
    }
}

/// Extracts the total from an `out count;` response.
///
/// The count arrives as `elements[0].tags.total`, a stringified integer.
fn parse_count(body: &serde_json::Value) -> Option<i64> {
    body["elements"]
        .as_array()?
        .first()?
        .get("tags")?
        .get("total")?
        .as_str()?
        .parse()
        .ok()
}

fn write_csv(rows: &[AmenityCounts], path: &Path) -> Result<(), AmenityError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
