//! US Census Bureau ACS client.
//!
//! Fetches per-county median household income and total population for
//! California from the ACS 5-year estimates. Responses are JSON arrays of
//! arrays with a header row:
//!
//! ```text
//! [["NAME","B19013_001E","state","county"],
//!  ["Los Angeles County, California","83411","06","037"], ...]
//! ```
//!
//! See <https://www.census.gov/data/developers/data-sets/acs-5year.html>

use std::time::Duration;

use crate::{CountyValue, EnrichError, normalize_county_name};

/// California state FIPS code.
pub const STATE_FIPS_CA: &str = "06";

/// ACS variable for median household income.
const VAR_MEDIAN_INCOME: &str = "B19013_001E";

/// ACS variable for total population.
const VAR_POPULATION: &str = "B01003_001E";

/// ACS vintage for income queries.
const INCOME_YEAR: u16 = 2022;

/// ACS vintage for population queries.
const POPULATION_YEAR: u16 = 2021;

/// Per-request timeout for Census calls.
const TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Census Bureau data API.
pub struct CensusClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CensusClient {
    /// Creates a client against the given base URL (normally
    /// `https://api.census.gov/data`).
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Median household income per California county.
    ///
    /// Degrades to an empty list on any failure.
    pub async fn median_income_by_county(&self) -> Vec<CountyValue> {
        match self.fetch_variable(INCOME_YEAR, VAR_MEDIAN_INCOME).await {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Census income fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// Total population per California county.
    ///
    /// Degrades to an empty list on any failure.
    pub async fn population_by_county(&self) -> Vec<CountyValue> {
        match self.fetch_variable(POPULATION_YEAR, VAR_POPULATION).await {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Census population fetch failed: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_variable(
        &self,
        year: u16,
        variable: &str,
    ) -> Result<Vec<CountyValue>, EnrichError> {
        let url = format!("{}/{year}/acs/acs5", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("get", format!("NAME,{variable}")),
                ("for", "county:*".to_string()),
                ("in", format!("state:{STATE_FIPS_CA}")),
                ("key", self.api_key.clone()),
            ])
            .timeout(TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        parse_county_rows(&body)
    }
}

/// Parses the array-of-arrays Census payload into county values.
///
/// The first row is a header and is skipped. Rows whose value column does
/// not parse as a number (the API uses null and negative sentinels for
/// suppressed estimates) are dropped, mirroring a coerce-and-drop load.
fn parse_county_rows(body: &serde_json::Value) -> Result<Vec<CountyValue>, EnrichError> {
    let rows = body.as_array().ok_or_else(|| EnrichError::Parse {
        message: "Census response is not an array".to_string(),
    })?;

    let mut values = Vec::new();

    for row in rows.iter().skip(1) {
        let Some(fields) = row.as_array() else {
            continue;
        };
        let Some(name) = fields.first().and_then(serde_json::Value::as_str) else {
            continue;
        };
        let Some(value) = fields.get(1).and_then(parse_numeric) else {
            continue;
        };

        values.push(CountyValue {
            county: normalize_county_name(name),
            value,
        });
    }

    Ok(values)
}

/// The Census API returns numbers as JSON strings; accept both.
fn parse_numeric(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
