//! Startup configuration.
//!
//! One explicit struct built from the environment at process start and
//! passed to every collaborator that needs it. Nothing in the workspace
//! reads environment variables after startup.

use std::path::PathBuf;

/// Application configuration for one run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// US Census Bureau API key. `None` disables income/population
    /// enrichment.
    pub census_api_key: Option<String>,
    /// FRED API key. `None` disables economic indicator fetching.
    pub fred_api_key: Option<String>,
    /// Census API base URL.
    pub census_base_url: String,
    /// FRED observations endpoint.
    pub fred_base_url: String,
    /// Overpass API interpreter endpoint (amenity refresh tool).
    pub overpass_url: String,
    /// Directory containing the three CSV sources.
    pub data_dir: PathBuf,
    /// Path of the DuckDB file holding the ranked table.
    pub db_path: PathBuf,
}

impl AnalyzerConfig {
    /// Builds the configuration from environment variables, using
    /// defaults for everything except the API keys.
    ///
    /// - `CENSUS_API_KEY`, `FRED_API_KEY` — enrichment credentials
    /// - `RENT_SCOUT_DATA_DIR` — CSV source directory (default `data`)
    /// - `RENT_SCOUT_DB` — DuckDB file path (default
    ///   `data/neighborhoods.duckdb`)
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir =
            PathBuf::from(std::env::var("RENT_SCOUT_DATA_DIR").unwrap_or_else(|_| "data".into()));
        let db_path = std::env::var("RENT_SCOUT_DB")
            .map_or_else(|_| data_dir.join("neighborhoods.duckdb"), PathBuf::from);

        Self {
            census_api_key: std::env::var("CENSUS_API_KEY").ok().filter(|k| !k.is_empty()),
            fred_api_key: std::env::var("FRED_API_KEY").ok().filter(|k| !k.is_empty()),
            census_base_url: "https://api.census.gov/data".to_string(),
            fred_base_url: "https://api.stlouisfed.org/fred/series/observations".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            data_dir,
            db_path,
        }
    }

    /// Whether the Census credential needed for income/population
    /// enrichment is present.
    #[must_use]
    pub const fn enrichment_enabled(&self) -> bool {
        self.census_api_key.is_some()
    }

    /// Path of the rent source CSV.
    #[must_use]
    pub fn rental_prices_path(&self) -> PathBuf {
        self.data_dir.join("rental_prices.csv")
    }

    /// Path of the amenity source CSV.
    #[must_use]
    pub fn amenities_path(&self) -> PathBuf {
        self.data_dir.join("amenities.csv")
    }

    /// Path of the crime source CSV.
    #[must_use]
    pub fn crime_data_path(&self) -> PathBuf {
        self.data_dir.join("crime_data.csv")
    }
}
