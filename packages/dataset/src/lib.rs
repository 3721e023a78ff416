#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV source loading and the three-way neighborhood merge.
//!
//! Reads the rent, amenity, and crime CSV sources and joins them into one
//! [`NeighborhoodRecord`] per neighborhood:
//!
//! 1. Left-join rent ↔ amenities on neighborhood name (missing amenity
//!    rows become zero counts).
//! 2. Derive the county from the trailing parenthetical in the name.
//! 3. Left-join the result ↔ crime on county (unmatched counties leave
//!    the crime rate unset; the scoring engine median-fills it).
//!
//! A missing source file is fatal: the dashboard must not render from a
//! partial dataset.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use rent_scout_models::{AnalyzerConfig, NeighborhoodRecord};
use serde::Deserialize;
use thiserror::Error;

/// Errors from dataset loading.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A required source file does not exist.
    #[error("Data source not found: {path}. Run the amenity refresh tool or restore the file.")]
    MissingSource {
        /// Path that was expected to exist.
        path: String,
    },

    /// CSV reading or deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of `rental_prices.csv`.
#[derive(Debug, Deserialize)]
struct RentRow {
    name: String,
    median_rent: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// One row of `amenities.csv`.
#[derive(Debug, Deserialize)]
struct AmenityRow {
    name: String,
    restaurant_count: i64,
    shop_count: i64,
    grocery_count: i64,
    total_amenities: i64,
}

/// One row of `crime_data.csv`.
#[derive(Debug, Deserialize)]
struct CrimeRow {
    county: String,
    crime_rate: f64,
}

/// Extracts the county from the last parenthetical in a neighborhood name.
///
/// `"Hollywood (Los Angeles)"` → `Some("Los Angeles")`. Names without a
/// parenthesis yield `None`; downstream joins tolerate the gap.
#[must_use]
pub fn extract_county(name: &str) -> Option<String> {
    let re = Regex::new(r"\(([^)]+)\)").ok()?;
    re.captures_iter(name)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Loads and merges the three sources configured in `config`.
///
/// # Errors
///
/// Returns [`DatasetError::MissingSource`] if any source file is absent,
/// or [`DatasetError::Csv`] if a file cannot be parsed.
pub fn load_merged(config: &AnalyzerConfig) -> Result<Vec<NeighborhoodRecord>, DatasetError> {
    let rents: Vec<RentRow> = read_rows(&config.rental_prices_path())?;
    let amenities: Vec<AmenityRow> = read_rows(&config.amenities_path())?;
    let crime: Vec<CrimeRow> = read_rows(&config.crime_data_path())?;

    log::info!(
        "Loaded {} rent rows, {} amenity rows, {} crime rows",
        rents.len(),
        amenities.len(),
        crime.len(),
    );

    Ok(merge(rents, &amenities, &crime))
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingSource {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect::<Result<Vec<T>, _>>().map_err(Into::into)
}

/// Joins the three row sets. Rent rows drive the output: one record per
/// rent row, in input order.
fn merge(
    rents: Vec<RentRow>,
    amenities: &[AmenityRow],
    crime: &[CrimeRow],
) -> Vec<NeighborhoodRecord> {
    let amenities_by_name: BTreeMap<&str, &AmenityRow> =
        amenities.iter().map(|a| (a.name.as_str(), a)).collect();
    let crime_by_county: BTreeMap<&str, f64> =
        crime.iter().map(|c| (c.county.as_str(), c.crime_rate)).collect();

    rents
        .into_iter()
        .map(|rent| {
            let mut record = NeighborhoodRecord::new(rent.name, rent.median_rent);
            record.latitude = rent.latitude;
            record.longitude = rent.longitude;

            if let Some(amenity) = amenities_by_name.get(record.name.as_str()) {
                record.restaurant_count = amenity.restaurant_count;
                record.shop_count = amenity.shop_count;
                record.grocery_count = amenity.grocery_count;
                record.total_amenities = amenity.total_amenities;
            }

            record.county = extract_county(&record.name);
            record.crime_rate = record
                .county
                .as_deref()
                .and_then(|county| crime_by_county.get(county).copied());

            if record.county.is_none() {
                log::warn!("No county parenthetical in neighborhood name: {}", record.name);
            }

            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rent(name: &str, median_rent: f64) -> RentRow {
        RentRow {
            name: name.to_string(),
            median_rent,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn extracts_county_from_parenthetical() {
        assert_eq!(
            extract_county("Hollywood (Los Angeles)").as_deref(),
            Some("Los Angeles")
        );
    }

    #[test]
    fn extracts_last_parenthetical() {
        assert_eq!(
            extract_county("Old Town (Historic) (San Diego)").as_deref(),
            Some("San Diego")
        );
    }

    #[test]
    fn no_parenthetical_yields_none() {
        assert_eq!(extract_county("Sacramento"), None);
    }

    #[test]
    fn merges_amenities_and_crime() {
        let rents = vec![rent("Hollywood (Los Angeles)", 2500.0)];
        let amenities = vec![AmenityRow {
            name: "Hollywood (Los Angeles)".to_string(),
            restaurant_count: 120,
            shop_count: 300,
            grocery_count: 15,
            total_amenities: 435,
        }];
        let crime = vec![CrimeRow {
            county: "Los Angeles".to_string(),
            crime_rate: 5.2,
        }];

        let records = merge(rents, &amenities, &crime);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].county.as_deref(), Some("Los Angeles"));
        assert_eq!(records[0].total_amenities, 435);
        assert_eq!(records[0].crime_rate, Some(5.2));
    }

    #[test]
    fn missing_amenity_row_becomes_zero_counts() {
        let rents = vec![rent("Venice (Los Angeles)", 3100.0)];
        let records = merge(rents, &[], &[]);
        assert_eq!(records[0].restaurant_count, 0);
        assert_eq!(records[0].total_amenities, 0);
    }

    #[test]
    fn unmatched_county_leaves_crime_rate_unset() {
        let rents = vec![rent("Midtown (Sacramento)", 1800.0)];
        let crime = vec![CrimeRow {
            county: "Los Angeles".to_string(),
            crime_rate: 5.2,
        }];
        let records = merge(rents, &[], &crime);
        assert_eq!(records[0].crime_rate, None);
    }

    #[test]
    fn missing_source_file_is_fatal() {
        let config = rent_scout_models::AnalyzerConfig {
            census_api_key: None,
            fred_api_key: None,
            census_base_url: String::new(),
            fred_base_url: String::new(),
            overpass_url: String::new(),
            data_dir: std::path::PathBuf::from("/nonexistent/rent-scout-data"),
            db_path: std::path::PathBuf::from("/nonexistent/rent-scout.duckdb"),
        };
        let err = load_merged(&config).unwrap_err();
        assert!(matches!(err, DatasetError::MissingSource { .. }));
    }

    #[test]
    fn rent_row_order_is_preserved() {
        let rents = vec![
            rent("B (Kern)", 1200.0),
            rent("A (Kern)", 1100.0),
        ];
        let records = merge(rents, &[], &[]);
        assert_eq!(records[0].name, "B (Kern)");
        assert_eq!(records[1].name, "A (Kern)");
    }
}
