#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Best-effort economic enrichment for neighborhood records.
//!
//! Replaces the fallback income and population constants with real
//! per-county figures from the US Census Bureau ACS, and fetches national
//! economic indicators from FRED. Every outward call is bounded (10 s) and
//! degrades to an empty result on timeout, non-2xx status, or a malformed
//! payload — downstream code cannot tell "enrichment failed" apart from
//! "enrichment disabled", which is the intended contract.
//!
//! The [`Enricher`] seam is decided once at startup: [`ApiEnricher`] when
//! API keys are configured, [`NoopEnricher`] otherwise.

use async_trait::async_trait;
use rent_scout_models::{AnalyzerConfig, EconomicIndicators, NeighborhoodRecord};
use thiserror::Error;

pub mod census;
pub mod fred;

pub use census::CensusClient;
pub use fred::FredClient;

/// Errors internal to the enrichment clients.
///
/// These never cross the [`Enricher`] boundary; the trait methods degrade
/// to empty results instead.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// One per-county figure fetched from the Census API.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyValue {
    /// Normalized county name (no `" County, California"` suffix).
    pub county: String,
    /// The fetched value (income in dollars or population headcount).
    pub value: f64,
}

/// Source of per-county economics and national indicators.
///
/// Implementations never fail: a fetch problem is an empty result.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Median household income per county. Empty on any failure.
    async fn county_incomes(&self) -> Vec<CountyValue>;

    /// Population per county. Empty on any failure.
    async fn county_populations(&self) -> Vec<CountyValue>;

    /// National/state economic indicators. Fields are `None` on failure.
    async fn economic_indicators(&self) -> EconomicIndicators;
}

/// Enricher backed by the real Census and FRED APIs.
pub struct ApiEnricher {
    census: CensusClient,
    fred: Option<FredClient>,
}

#[async_trait]
impl Enricher for ApiEnricher {
    async fn county_incomes(&self) -> Vec<CountyValue> {
        self.census.median_income_by_county().await
    }

    async fn county_populations(&self) -> Vec<CountyValue> {
        self.census.population_by_county().await
    }

    async fn economic_indicators(&self) -> EconomicIndicators {
        match &self.fred {
            Some(fred) => fred.indicators().await,
            None => EconomicIndicators::default(),
        }
    }
}

/// Enricher that always returns nothing, leaving the fallback constants
/// in effect. Used when no API keys are configured.
pub struct NoopEnricher;

#[async_trait]
impl Enricher for NoopEnricher {
    async fn county_incomes(&self) -> Vec<CountyValue> {
        Vec::new()
    }

    async fn county_populations(&self) -> Vec<CountyValue> {
        Vec::new()
    }

    async fn economic_indicators(&self) -> EconomicIndicators {
        EconomicIndicators::default()
    }
}

/// Picks the enricher implementation from the startup configuration.
///
/// Requires the Census key for county enrichment; the FRED key is
/// optional on top of that and only gates the indicator fetches.
#[must_use]
pub fn from_config(config: &AnalyzerConfig) -> Box<dyn Enricher> {
    match &config.census_api_key {
        Some(census_key) => {
            let fred = config
                .fred_api_key
                .as_ref()
                .map(|key| FredClient::new(&config.fred_base_url, key));
            Box::new(ApiEnricher {
                census: CensusClient::new(&config.census_base_url, census_key),
                fred,
            })
        }
        None => {
            log::info!("No CENSUS_API_KEY configured; enrichment disabled");
            Box::new(NoopEnricher)
        }
    }
}

/// Merges fetched per-county income and population figures into the
/// records, matching on the county derived from each neighborhood name.
///
/// Counties with no fetched figure silently keep their fallback values.
pub fn apply_enrichment(
    records: &mut [NeighborhoodRecord],
    incomes: &[CountyValue],
    populations: &[CountyValue],
) {
    let mut matched = 0usize;

    for record in records.iter_mut() {
        let Some(county) = record.county.as_deref() else {
            continue;
        };

        if let Some(income) = incomes.iter().find(|v| v.county == county) {
            record.median_income = income.value;
            matched += 1;
        }
        if let Some(population) = populations.iter().find(|v| v.county == county) {
            #[allow(clippy::cast_possible_truncation)]
            {
                record.population = population.value as i64;
            }
        }
    }

    log::info!(
        "Enrichment matched {matched}/{} records to Census income data",
        records.len(),
    );
}

/// Strips the state suffix from a Census county display name.
///
/// `"Los Angeles County, California"` → `"Los Angeles"`; the bare
/// `", California"` variant is also handled.
#[must_use]
pub fn normalize_county_name(name: &str) -> String {
    name.trim_end_matches(" County, California")
        .trim_end_matches(", California")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_county_california_suffix() {
        assert_eq!(
            normalize_county_name("Los Angeles County, California"),
            "Los Angeles"
        );
    }

    #[test]
    fn strips_bare_california_suffix() {
        assert_eq!(normalize_county_name("San Francisco, California"), "San Francisco");
    }

    #[test]
    fn leaves_plain_names_alone() {
        assert_eq!(normalize_county_name("Alameda"), "Alameda");
    }

    #[test]
    fn applies_matching_income_and_population() {
        let mut record = NeighborhoodRecord::new("Hollywood (Los Angeles)", 2500.0);
        record.county = Some("Los Angeles".to_string());
        let mut records = vec![record];

        let incomes = vec![CountyValue {
            county: "Los Angeles".to_string(),
            value: 83_411.0,
        }];
        let populations = vec![CountyValue {
            county: "Los Angeles".to_string(),
            value: 9_936_690.0,
        }];

        apply_enrichment(&mut records, &incomes, &populations);
        assert!((records[0].median_income - 83_411.0).abs() < f64::EPSILON);
        assert_eq!(records[0].population, 9_936_690);
    }

    #[test]
    fn non_matching_county_keeps_fallbacks() {
        let mut record = NeighborhoodRecord::new("Midtown (Sacramento)", 1800.0);
        record.county = Some("Sacramento".to_string());
        let mut records = vec![record];

        let incomes = vec![CountyValue {
            county: "Los Angeles".to_string(),
            value: 83_411.0,
        }];

        apply_enrichment(&mut records, &incomes, &[]);
        assert!((records[0].median_income - rent_scout_models::FALLBACK_MEDIAN_INCOME).abs() < f64::EPSILON);
        assert_eq!(records[0].population, rent_scout_models::FALLBACK_POPULATION);
    }

    #[tokio::test]
    async fn noop_enricher_returns_nothing() {
        let enricher = NoopEnricher;
        assert!(enricher.county_incomes().await.is_empty());
        assert!(enricher.county_populations().await.is_empty());
        assert_eq!(enricher.economic_indicators().await, EconomicIndicators::default());
    }
}
