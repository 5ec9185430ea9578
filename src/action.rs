//! Actions - intents from the keyboard and results from the fetch task

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::PredictionResult;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Prediction category =====
    /// Intent: request the prediction (only the first one reaches the network)
    PredictionFetch,

    /// Result: prediction payload received and decoded
    PredictionDidLoad(PredictionResult),

    /// Result: request failed; carries the logged error for the debug view
    PredictionDidError(String),

    // ===== UI category =====
    UiScrollDown,
    UiScrollUp,
    UiScrollTop,

    /// Terminal size changed (width, height)
    UiResize(u16, u16),

    /// Force a re-render
    Render,

    // ===== Uncategorized (global) =====
    Quit,
}
