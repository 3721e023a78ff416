//! FRED (Federal Reserve Economic Data) series client.
//!
//! Fetches observation series for the indicator summary shown alongside
//! the rankings: the US unemployment rate (`UNRATE`), the 30-year fixed
//! mortgage rate (`MORTGAGE30US`), and the California housing price index
//! (`CASTHPI`).
//!
//! See <https://fred.stlouisfed.org/docs/api/fred/series_observations.html>

use std::time::Duration;

use chrono::NaiveDate;
use rent_scout_models::EconomicIndicators;

use crate::EnrichError;

/// US unemployment rate series.
const SERIES_UNEMPLOYMENT: &str = "UNRATE";

/// 30-year fixed mortgage rate series.
const SERIES_MORTGAGE: &str = "MORTGAGE30US";

/// California housing price index series.
const SERIES_CA_HPI: &str = "CASTHPI";

/// Default observation window start.
const DEFAULT_START_DATE: &str = "2023-01-01";

/// Per-request timeout for FRED calls.
const TIMEOUT: Duration = Duration::from_secs(10);

/// One dated observation from a FRED series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
}

/// Client for the FRED observations endpoint.
pub struct FredClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    /// Creates a client against the given observations endpoint (normally
    /// `https://api.stlouisfed.org/fred/series/observations`).
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetches a time-ordered series from `start_date` onward.
    ///
    /// Degrades to an empty list on any failure.
    pub async fn series(&self, series_id: &str, start_date: &str) -> Vec<Observation> {
        match self.fetch_series(series_id, start_date).await {
            Ok(observations) => observations,
            Err(e) => {
                log::warn!("FRED fetch failed for {series_id}: {e}");
                Vec::new()
            }
        }
    }

    /// Latest US unemployment rate, if the series is reachable.
    pub async fn unemployment_rate(&self) -> Option<f64> {
        self.series(SERIES_UNEMPLOYMENT, DEFAULT_START_DATE)
            .await
            .last()
            .map(|o| o.value)
    }

    /// Latest 30-year mortgage rate, if the series is reachable.
    pub async fn mortgage_rate(&self) -> Option<f64> {
        self.series(SERIES_MORTGAGE, DEFAULT_START_DATE)
            .await
            .last()
            .map(|o| o.value)
    }

    /// Fetches all indicators in one pass.
    pub async fn indicators(&self) -> EconomicIndicators {
        let hpi = self.series(SERIES_CA_HPI, DEFAULT_START_DATE).await;
        let (latest_hpi, housing_price_trend) = hpi_summary(&hpi);

        EconomicIndicators {
            unemployment_rate: self.unemployment_rate().await,
            mortgage_rate: self.mortgage_rate().await,
            latest_hpi,
            housing_price_trend,
        }
    }

    async fn fetch_series(
        &self,
        series_id: &str,
        start_date: &str,
    ) -> Result<Vec<Observation>, EnrichError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("observation_start", start_date),
            ])
            .timeout(TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        parse_observations(&body)
    }
}

/// Parses the `observations` array from a FRED JSON payload.
///
/// FRED encodes missing observations as the literal `"."`; those rows are
/// skipped rather than treated as errors.
fn parse_observations(body: &serde_json::Value) -> Result<Vec<Observation>, EnrichError> {
    let observations = body["observations"]
        .as_array()
        .ok_or_else(|| EnrichError::Parse {
            message: "Missing observations array in FRED response".to_string(),
        })?;

    let mut parsed = Vec::new();

    for obs in observations {
        let Some(date) = obs["date"]
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        else {
            continue;
        };
        let Some(value) = obs["value"].as_str().and_then(|s| s.parse::<f64>().ok()) else {
            continue;
        };

        parsed.push(Observation { date, value });
    }

    Ok(parsed)
}

/// Latest housing price index value and its percent change over the
/// trailing twelve observations.
fn hpi_summary(observations: &[Observation]) -> (Option<f64>, Option<f64>) {
    let latest = observations.last().map(|o| o.value);

    let window: &[Observation] = if observations.len() > 12 {
        &observations[observations.len() - 12..]
    } else {
        observations
    };

    let trend = match (window.first(), window.last()) {
        (Some(first), Some(last)) if window.len() >= 2 && first.value != 0.0 => {
            let pct = (last.value - first.value) / first.value * 100.0;
            Some((pct * 100.0).round() / 100.0)
        }
        _ => None,
    };

    (latest, trend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, value: f64) -> Observation {
        Observation {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            value,
        }
    }

    #[test]
    fn parses_observations() {
        let body = serde_json::json!({
            "observations": [
                {"date": "2024-01-01", "value": "3.7"},
                {"date": "2024-02-01", "value": "3.9"}
            ]
        });
        let parsed = parse_observations(&body).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!((parsed[1].value - 3.9).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_missing_value_sentinel() {
        let body = serde_json::json!({
            "observations": [
                {"date": "2024-01-01", "value": "."},
                {"date": "2024-02-01", "value": "6.9"}
            ]
        });
        let parsed = parse_observations(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!((parsed[0].value - 6.9).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_observations_key_is_a_parse_error() {
        let body = serde_json::json!({"error_message": "bad api key"});
        assert!(parse_observations(&body).is_err());
    }

    #[test]
    fn hpi_trend_uses_trailing_window() {
        let observations: Vec<Observation> = (0..14)
            .map(|i| obs(&format!("2024-{:02}-01", (i % 12) + 1), 100.0 + f64::from(i)))
            .collect();
        let (latest, trend) = hpi_summary(&observations);
        assert_eq!(latest, Some(113.0));
        // Window is observations 2..13: (113 - 102) / 102 * 100.
        assert_eq!(trend, Some(10.78));
    }

    #[test]
    fn hpi_trend_absent_for_single_observation() {
        let (latest, trend) = hpi_summary(&[obs("2024-01-01", 100.0)]);
        assert_eq!(latest, Some(100.0));
        assert_eq!(trend, None);
    }
}
