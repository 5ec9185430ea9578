//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::components::{prediction_body, prediction_view};
use crate::effect::Effect;
use crate::state::{AppState, Viewport};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Prediction actions =====
        Action::PredictionFetch => {
            // One request per activation: only the first fetch leaves Empty
            if !state.prediction.is_empty() {
                return DispatchResult::unchanged();
            }
            state.prediction = DataResource::Loading;
            state.scroll = 0;
            DispatchResult::changed_with(Effect::FetchPrediction {
                query: state.query.clone(),
            })
        }

        Action::PredictionDidLoad(mut result) => {
            if result.city.trim().is_empty() {
                result.city = state.query.city.clone();
            }
            state.prediction = DataResource::Loaded(result);
            state.scroll = 0;
            DispatchResult::changed()
        }

        Action::PredictionDidError(msg) => {
            state.prediction = DataResource::Failed(msg);
            state.scroll = 0;
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiScrollDown => {
            let Some(max) = scroll_limit(state) else {
                return DispatchResult::unchanged();
            };
            if state.scroll < max {
                state.scroll += 1;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::UiScrollUp => {
            if state.scroll > 0 {
                state.scroll -= 1;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::UiScrollTop => {
            if state.scroll > 0 {
                state.scroll = 0;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::UiResize(width, height) => {
            state.viewport = Some(Viewport { width, height });
            if let Some(max) = scroll_limit(state) {
                state.scroll = state.scroll.min(max);
            }
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Highest scroll offset that still shows content; None until loaded.
/// Without a known viewport every logical line counts as one row.
fn scroll_limit(state: &AppState) -> Option<u16> {
    let result = state.prediction.data()?;
    Some(match state.viewport {
        Some(Viewport { width, height }) => prediction_view::max_scroll(result, width, height),
        None => prediction_body::line_count(result).saturating_sub(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EvidenceItem, PredictionResult};

    fn sample() -> PredictionResult {
        PredictionResult {
            date: "2024-05-01".into(),
            city: "cdmx".into(),
            level: "alto".into(),
            peak_hours: vec!["07:00-09:00".into(), "18:00-20:00".into()],
            reasons: vec!["lluvia".into()],
            evidence: vec![EvidenceItem {
                title: Some("Reporte vial".into()),
                url: None,
            }],
            prob: None,
        }
    }

    #[test]
    fn test_fetch_sets_loading_and_emits_effect() {
        let mut state = AppState::default();
        assert!(state.prediction.is_empty());

        let result = reducer(&mut state, Action::PredictionFetch);

        assert!(result.changed);
        assert!(state.prediction.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchPrediction {
                query: state.query.clone()
            }]
        );
    }

    #[test]
    fn test_second_fetch_is_ignored() {
        let mut state = AppState::default();
        reducer(&mut state, Action::PredictionFetch);

        let result = reducer(&mut state, Action::PredictionFetch);
        assert!(!result.changed);
        assert!(result.effects.is_empty());

        reducer(&mut state, Action::PredictionDidError("timeout".into()));
        let result = reducer(&mut state, Action::PredictionFetch);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert!(state.prediction.is_failed());
    }

    #[test]
    fn test_did_load_stores_prediction() {
        let mut state = AppState {
            prediction: DataResource::Loading,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::PredictionDidLoad(sample()));

        assert!(result.changed);
        assert!(!state.is_loading());
        assert_eq!(state.prediction(), Some(&sample()));
    }

    #[test]
    fn test_did_error_clears_loading_without_prediction() {
        let mut state = AppState {
            prediction: DataResource::Loading,
            ..Default::default()
        };

        reducer(&mut state, Action::PredictionDidError("HTTP 500".into()));

        assert!(!state.is_loading());
        assert!(state.prediction().is_none());
        assert_eq!(state.prediction.error(), Some("HTTP 500"));
    }

    #[test]
    fn test_scroll_requires_loaded_prediction() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::UiScrollDown);
        assert!(!result.changed);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut state = AppState {
            prediction: DataResource::Loaded(sample()),
            ..Default::default()
        };
        let max = prediction_body::line_count(&sample()) - 1;

        for _ in 0..(max + 5) {
            reducer(&mut state, Action::UiScrollDown);
        }
        assert_eq!(state.scroll, max);

        assert!(reducer(&mut state, Action::UiScrollUp).changed);
        assert_eq!(state.scroll, max - 1);

        assert!(reducer(&mut state, Action::UiScrollTop).changed);
        assert_eq!(state.scroll, 0);
        assert!(!reducer(&mut state, Action::UiScrollUp).changed);
    }

    #[test]
    fn test_did_load_fills_missing_city_from_query() {
        let mut state = AppState::default();
        state.query.city = "cdmx".into();
        let payload = PredictionResult {
            city: String::new(),
            ..sample()
        };

        reducer(&mut state, Action::PredictionDidLoad(payload));

        assert_eq!(state.prediction().map(|p| p.city.as_str()), Some("cdmx"));
    }

    #[test]
    fn test_scroll_reaches_last_wrapped_row() {
        let long = PredictionResult {
            reasons: vec![format!("{}fin", "palabra ".repeat(60))],
            ..sample()
        };
        let mut state = AppState {
            prediction: DataResource::Loaded(long.clone()),
            ..Default::default()
        };
        reducer(&mut state, Action::UiResize(30, 8));

        for _ in 0..200 {
            reducer(&mut state, Action::UiScrollDown);
        }

        let max = prediction_view::max_scroll(&long, 30, 8);
        assert!(max > prediction_body::line_count(&long));
        assert_eq!(state.scroll, max);
    }

    #[test]
    fn test_resize_clamps_scroll() {
        let mut state = AppState {
            prediction: DataResource::Loaded(sample()),
            scroll: 9,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::UiResize(80, 40));

        assert!(result.changed);
        assert_eq!(state.viewport, Some(Viewport { width: 80, height: 40 }));
        assert_eq!(state.scroll, 0);
    }
}
