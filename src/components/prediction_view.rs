use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, PredictionBody, PredictionBodyProps};
use super::prediction_body;
use crate::action::Action;
use crate::state::{AppState, PredictionResult};

/// Rows under the prediction taken by the key hint bar
pub const HINT_BAR_HEIGHT: u16 = 1;

/// Largest useful scroll offset when the whole view is `width` x `height`
pub fn max_scroll(result: &PredictionResult, width: u16, height: u16) -> u16 {
    prediction_body::max_scroll(result, width, height.saturating_sub(HINT_BAR_HEIGHT))
}

/// Props for PredictionView - read-only view of state
pub struct PredictionViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Root component: the prediction plus, once loaded, a key hint bar
#[derive(Default)]
pub struct PredictionView;

impl Component<Action> for PredictionView {
    type Props<'a> = PredictionViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Action::UiScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::UiScrollUp),
                KeyCode::Char('g') | KeyCode::Home => Some(Action::UiScrollTop),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: PredictionViewProps<'_>) {
        let mut body = PredictionBody;

        // Placeholders stand alone
        if props.state.prediction().is_none() {
            body.render(frame, area, PredictionBodyProps { state: props.state });
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Prediction
            Constraint::Length(HINT_BAR_HEIGHT), // Help bar
        ])
        .split(area);

        body.render(frame, chunks[0], PredictionBodyProps { state: props.state });

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[1],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("j/k", "scroll"),
                    StatusBarHint::new("g", "top"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::DataResource;
    use tui_dispatch::testing::*;

    fn keys(
        component: &mut PredictionView,
        state: &AppState,
        k: &str,
        focused: bool,
    ) -> Vec<Action> {
        let props = PredictionViewProps {
            state,
            is_focused: focused,
        };
        component
            .handle_event(&EventKind::Key(key(k)), props)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_handle_event_scroll() {
        let mut component = PredictionView;
        let state = AppState::default();

        let actions = keys(&mut component, &state, "j", true);
        actions.assert_count(1);
        actions.assert_first(Action::UiScrollDown);

        keys(&mut component, &state, "k", true).assert_first(Action::UiScrollUp);
        keys(&mut component, &state, "g", true).assert_first(Action::UiScrollTop);
    }

    #[test]
    fn test_handle_event_quit() {
        let mut component = PredictionView;
        let state = AppState::default();

        keys(&mut component, &state, "q", true).assert_first(Action::Quit);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = PredictionView;
        let state = AppState::default();

        keys(&mut component, &state, "j", false).assert_empty();
    }

    #[test]
    fn test_render_hint_bar_only_when_loaded() {
        let mut render = RenderHarness::new(80, 20);
        let mut component = PredictionView;

        let loading = AppState::default();
        let output = render.render_to_string_plain(|frame| {
            let props = PredictionViewProps {
                state: &loading,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });
        assert!(!output.contains("quit"));

        let loaded = AppState {
            prediction: DataResource::Loaded(PredictionResult {
                level: "Bajo".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let output = render.render_to_string_plain(|frame| {
            let props = PredictionViewProps {
                state: &loaded,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });
        assert!(output.contains("Nivel: Bajo"));
        assert!(output.contains("quit"));
    }
}
