//! Prediction service client

use crate::action::Action;
use crate::config::{ApiBase, PredictionQuery};
use crate::state::PredictionResult;

/// Why a prediction could not be obtained. The view treats every variant
/// the same; the distinction only shows up in the logs.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("prediction service responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed prediction payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client bound to one prediction service
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: reqwest::Client,
    base: ApiBase,
}

impl PredictionClient {
    pub fn new(base: ApiBase) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(http: reqwest::Client, base: ApiBase) -> Self {
        Self { http, base }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// `GET {base}/v1/predict?date=..&city=..`
    pub async fn fetch_prediction(
        &self,
        query: &PredictionQuery,
    ) -> Result<PredictionResult, FetchError> {
        let url = self.base.predict_url(query);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Run the request and turn the outcome into the action the store expects.
    /// Failures are logged here and never escape as errors.
    pub async fn load(&self, query: &PredictionQuery) -> Action {
        match self.fetch_prediction(query).await {
            Ok(result) => {
                tracing::info!(
                    date = %result.date,
                    city = %result.city,
                    level = %result.level,
                    "prediction loaded"
                );
                Action::PredictionDidLoad(result)
            }
            Err(error) => {
                tracing::error!(
                    url = %self.base.predict_url(query),
                    %error,
                    "prediction request failed"
                );
                Action::PredictionDidError(error.to_string())
            }
        }
    }
}
