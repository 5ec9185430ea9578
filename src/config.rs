//! Request configuration: where the prediction service lives and what to ask it

use std::fmt;

use chrono::{Local, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Local development address of the prediction service
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable consulted by the binary for the base URL
pub const API_BASE_ENV: &str = "PREDICTION_API_BASE";

/// City requested when none is given
pub const DEFAULT_CITY: &str = "cdmx";

/// Date format used on the wire and in the rendered view
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Base URL of the prediction service, stored without a trailing slash
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    /// Resolve a configured value, falling back to [`DEFAULT_API_BASE`] when
    /// it is missing or blank.
    pub fn resolve(value: Option<&str>) -> Self {
        let base = value
            .map(|v| v.trim().trim_end_matches('/'))
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE);
        Self(base.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URL of the predict endpoint for the given query
    pub fn predict_url(&self, query: &PredictionQuery) -> String {
        format!(
            "{}/v1/predict?date={}&city={}",
            self.0,
            urlencoding::encode(&query.date),
            urlencoding::encode(&query.city)
        )
    }
}

impl Default for ApiBase {
    fn default() -> Self {
        Self::resolve(None)
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters of the one prediction request a view makes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionQuery {
    /// `YYYY-MM-DD`
    pub date: String,
    pub city: String,
}

impl PredictionQuery {
    pub fn new(date: NaiveDate, city: &str) -> Self {
        let city = match city.trim() {
            "" => DEFAULT_CITY,
            city => city,
        };
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            city: city.to_string(),
        }
    }

    /// Query for today's date on the local clock
    pub fn today(city: &str) -> Self {
        Self::new(Local::now().date_naive(), city)
    }
}

impl Default for PredictionQuery {
    fn default() -> Self {
        Self::today(DEFAULT_CITY)
    }
}
