//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::config::PredictionQuery;

/// A source cited by the prediction service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceItem {
    /// May be null; see [`EvidenceItem::label`]
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Shown for evidence the service sent without a title
pub const UNTITLED_EVIDENCE: &str = "evento";

impl EvidenceItem {
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED_EVIDENCE)
    }

    /// The link target, if the service sent a non-empty one
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// Daily traffic forecast from `/v1/predict`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResult {
    pub date: String,
    /// Absent from some service versions; filled from the request on load
    #[serde(default)]
    pub city: String,
    pub level: String,
    pub peak_hours: Vec<String>,
    pub reasons: Vec<String>,
    pub evidence: Vec<EvidenceItem>,
    /// Probability of the predicted level, when the service computes one
    #[serde(default)]
    pub prob: Option<f64>,
}

impl PredictionResult {
    pub fn title(&self) -> String {
        format!("Predicción de tráfico para {}", self.city.to_uppercase())
    }

    pub fn peak_hours_line(&self) -> String {
        self.peak_hours.join(", ")
    }

    pub fn severity(&self) -> Severity {
        Severity::from_label(&self.level)
    }

    /// `prob` as a whole percentage. The clamp keeps the cast within 0..=100.
    pub fn prob_percent(&self) -> Option<u8> {
        self.prob
            .filter(|p| p.is_finite())
            .map(|p| (p.clamp(0.0, 1.0) * 100.0).round() as u8)
    }
}

/// Severity scale behind the service's `level` labels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    VeryHigh,
    Extreme,
    Unknown,
}

impl Severity {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "bajo" => Severity::Low,
            "medio" => Severity::Medium,
            "alto" => Severity::High,
            "muy alto" => Severity::VeryHigh,
            "extremo" => Severity::Extreme,
            _ => Severity::Unknown,
        }
    }
}

/// Terminal size the view is drawn into
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Date and city of the single request
    #[debug(section = "Request", label = "Query", debug_fmt)]
    pub query: PredictionQuery,

    /// Prediction lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Prediction", label = "Data", debug_fmt)]
    pub prediction: DataResource<PredictionResult>,

    /// First visible line of the loaded view
    #[debug(skip)]
    pub scroll: u16,

    /// Last known terminal size, used to bound scrolling
    #[debug(skip)]
    pub viewport: Option<Viewport>,
}

impl AppState {
    pub fn new(query: PredictionQuery) -> Self {
        Self {
            query,
            prediction: DataResource::Empty,
            scroll: 0,
            viewport: None,
        }
    }

    /// True until the request settles, including before it is issued
    pub fn is_loading(&self) -> bool {
        self.prediction.is_empty() || self.prediction.is_loading()
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.data()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PredictionQuery::default())
    }
}
