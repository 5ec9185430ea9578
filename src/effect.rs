//! Effects - side effects declared by the reducer

use crate::config::PredictionQuery;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the prediction request for the given date and city
    FetchPrediction { query: PredictionQuery },
}
