#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data model for the rent-scout workspace.
//!
//! Defines the neighborhood record that flows through the whole pipeline
//! (load, enrich, score, store), the user-supplied score weights, the
//! economic indicator summary, and the startup configuration.

use serde::{Deserialize, Serialize};

pub mod config;

pub use config::AnalyzerConfig;

/// Median household income (annual dollars) assumed when Census enrichment
/// is disabled or returns nothing for a county.
pub const FALLBACK_MEDIAN_INCOME: f64 = 75_000.0;

/// County population assumed when Census enrichment is disabled or returns
/// nothing for a county.
pub const FALLBACK_POPULATION: i64 = 500_000;

/// Weight triple used when the user sets all three priority sliders to
/// zero.
pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    affordability: 0.4,
    amenities: 0.3,
    safety: 0.3,
};

/// One California rental neighborhood, unique by `name`.
///
/// The name encodes the county as a trailing parenthetical, e.g.
/// `"Hollywood (Los Angeles)"`. Score fields are zero until the record has
/// passed through the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodRecord {
    /// Neighborhood name (primary key).
    pub name: String,
    /// County derived from the parenthetical in `name`, if present.
    pub county: Option<String>,
    /// Latitude (WGS84), when the rent source provides coordinates.
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Median monthly rent in dollars.
    pub median_rent: f64,
    /// Median annual household income for the county. Starts at
    /// [`FALLBACK_MEDIAN_INCOME`]; replaced when enrichment matches.
    pub median_income: f64,
    /// County population. Starts at [`FALLBACK_POPULATION`].
    pub population: i64,
    /// Violent crimes per 1,000 residents. `None` until the scoring engine
    /// fills missing values with the dataset median.
    pub crime_rate: Option<f64>,
    /// Restaurants within 1 km.
    pub restaurant_count: i64,
    /// Shops of any kind within 1 km.
    pub shop_count: i64,
    /// Supermarkets within 1 km.
    pub grocery_count: i64,
    /// Sum of the three amenity counts.
    pub total_amenities: i64,
    /// Affordability sub-score, 0-100.
    pub affordability: f64,
    /// Amenity sub-score, 0-100.
    pub amenity_score: f64,
    /// Safety sub-score, 0-100.
    pub safety_score: f64,
    /// Weighted composite of the three sub-scores, 0-100.
    pub value_score: f64,
    /// 1-based rank by descending value score (1 = best).
    pub rank: i64,
}

impl NeighborhoodRecord {
    /// Creates an unscored record with fallback income and population.
    #[must_use]
    pub fn new(name: impl Into<String>, median_rent: f64) -> Self {
        Self {
            name: name.into(),
            county: None,
            latitude: None,
            longitude: None,
            median_rent,
            median_income: FALLBACK_MEDIAN_INCOME,
            population: FALLBACK_POPULATION,
            crime_rate: None,
            restaurant_count: 0,
            shop_count: 0,
            grocery_count: 0,
            total_amenities: 0,
            affordability: 0.0,
            amenity_score: 0.0,
            safety_score: 0.0,
            value_score: 0.0,
            rank: 0,
        }
    }
}

/// User priorities for the three sub-scores.
///
/// Raw slider values (any non-negative floats); [`Self::normalized`]
/// produces the triple actually applied to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight on the affordability sub-score.
    pub affordability: f64,
    /// Weight on the amenity sub-score.
    pub amenities: f64,
    /// Weight on the safety sub-score.
    pub safety: f64,
}

impl ScoreWeights {
    /// Returns the triple renormalized to sum to 1.
    ///
    /// A zero or non-finite sum falls back to [`DEFAULT_WEIGHTS`] instead
    /// of dividing by zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let total = self.affordability + self.amenities + self.safety;
        if total <= 0.0 || !total.is_finite() {
            return DEFAULT_WEIGHTS;
        }
        Self {
            affordability: self.affordability / total,
            amenities: self.amenities / total,
            safety: self.safety / total,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Snapshot of national/state economic indicators from FRED.
///
/// Every field is optional: any fetch failure leaves its field `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicIndicators {
    /// Latest US unemployment rate (percent).
    pub unemployment_rate: Option<f64>,
    /// Latest 30-year fixed mortgage rate (percent).
    pub mortgage_rate: Option<f64>,
    /// Latest California housing price index value.
    pub latest_hpi: Option<f64>,
    /// Percent change in the housing price index over the trailing twelve
    /// observations.
    pub housing_price_trend: Option<f64>,
}
