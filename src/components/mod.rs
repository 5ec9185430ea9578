pub mod prediction_body;
pub mod prediction_view;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use prediction_body::{
    LINK_LABEL, LOADING_MESSAGE, PredictionBody, PredictionBodyProps, UNAVAILABLE_MESSAGE,
};
pub use prediction_view::{PredictionView, PredictionViewProps};
