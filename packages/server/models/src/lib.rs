#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the rent scout server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the pipeline record type to allow independent evolution of the
//! API contract.

use rent_scout_database::CountyStats;
use rent_scout_models::NeighborhoodRecord;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server considers itself healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// A ranked neighborhood as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNeighborhood {
    /// 1-based rank (1 = best value).
    pub rank: i64,
    /// Neighborhood name.
    pub name: String,
    /// County, when derivable from the name.
    pub county: Option<String>,
    /// Median monthly rent in dollars.
    pub median_rent: f64,
    /// Median annual household income for the county.
    pub median_income: f64,
    /// County population.
    pub population: i64,
    /// Violent crimes per 1,000 residents.
    pub crime_rate: Option<f64>,
    /// Restaurants within 1 km.
    pub restaurant_count: i64,
    /// Shops within 1 km.
    pub shop_count: i64,
    /// Supermarkets within 1 km.
    pub grocery_count: i64,
    /// Sum of the amenity counts.
    pub total_amenities: i64,
    /// Affordability sub-score, 0-100.
    pub affordability: f64,
    /// Amenity sub-score, 0-100.
    pub amenity_score: f64,
    /// Safety sub-score, 0-100.
    pub safety_score: f64,
    /// Weighted composite score, 0-100.
    pub value_score: f64,
}

impl From<NeighborhoodRecord> for ApiNeighborhood {
    fn from(record: NeighborhoodRecord) -> Self {
        Self {
            rank: record.rank,
            name: record.name,
            county: record.county,
            median_rent: record.median_rent,
            median_income: record.median_income,
            population: record.population,
            crime_rate: record.crime_rate,
            restaurant_count: record.restaurant_count,
            shop_count: record.shop_count,
            grocery_count: record.grocery_count,
            total_amenities: record.total_amenities,
            affordability: record.affordability,
            amenity_score: record.amenity_score,
            safety_score: record.safety_score,
            value_score: record.value_score,
        }
    }
}

/// Per-county aggregates as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountyStats {
    /// County name.
    pub county: String,
    /// Number of neighborhoods.
    pub neighborhood_count: i64,
    /// Average median rent.
    pub avg_rent: f64,
    /// Average crime rate.
    pub avg_crime_rate: Option<f64>,
    /// Average composite value score.
    pub avg_value_score: f64,
}

impl From<CountyStats> for ApiCountyStats {
    fn from(stats: CountyStats) -> Self {
        Self {
            county: stats.county,
            neighborhood_count: stats.neighborhood_count,
            avg_rent: stats.avg_rent,
            avg_crime_rate: stats.avg_crime_rate,
            avg_value_score: stats.avg_value_score,
        }
    }
}

/// Query parameters for the neighborhoods endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodQueryParams {
    /// County filter; omit or pass `All California` for every county.
    pub county: Option<String>,
    /// Maximum monthly rent in dollars (default 3000).
    pub max_rent: Option<f64>,
}

/// Request body for applying a new weight triple.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    /// Affordability priority (raw slider value, >= 0).
    pub affordability: f64,
    /// Amenity priority.
    pub amenities: f64,
    /// Safety priority.
    pub safety: f64,
}
