use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::Component;
use crate::action::Action;
use crate::state::{AppState, PredictionResult, Severity};

pub const LOADING_MESSAGE: &str = "Cargando...";
pub const UNAVAILABLE_MESSAGE: &str = "No se pudo obtener la predicción.";
pub const LINK_LABEL: &str = "enlace";

/// Widest the loaded view grows before centering
const MAX_CONTENT_WIDTH: u16 = 80;

pub struct PredictionBody;

pub struct PredictionBodyProps<'a> {
    pub state: &'a AppState,
}

impl Component<Action> for PredictionBody {
    type Props<'a> = PredictionBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match Screen::from_state(props.state) {
            Screen::Loading => render_placeholder(
                frame,
                area,
                LOADING_MESSAGE,
                Style::default().fg(Color::DarkGray),
            ),
            Screen::Unavailable => render_placeholder(
                frame,
                area,
                UNAVAILABLE_MESSAGE,
                Style::default().fg(Color::Rgb(200, 100, 100)),
            ),
            Screen::Ready(result) => render_ready(frame, area, result, props.state.scroll),
        }
    }
}

/// Which of the three mutually exclusive views the state calls for
enum Screen<'a> {
    Loading,
    Unavailable,
    Ready(&'a PredictionResult),
}

impl<'a> Screen<'a> {
    fn from_state(state: &'a AppState) -> Self {
        if state.is_loading() {
            return Screen::Loading;
        }
        match state.prediction() {
            Some(result) => Screen::Ready(result),
            None => Screen::Unavailable,
        }
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let [row] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    let line = Line::from(Span::styled(message.to_string(), style)).centered();
    frame.render_widget(Paragraph::new(line), row);
}

fn render_ready(frame: &mut Frame, area: Rect, result: &PredictionResult, scroll: u16) {
    let [column] = Layout::horizontal([Constraint::Max(MAX_CONTENT_WIDTH)])
        .flex(Flex::Center)
        .areas(area);

    let scroll = scroll.min(max_scroll(result, column.width, column.height));
    frame.render_widget(paragraph(result).scroll((scroll, 0)), column);
}

fn paragraph(result: &PredictionResult) -> Paragraph<'static> {
    Paragraph::new(prediction_lines(result)).wrap(Wrap { trim: false })
}

/// Largest useful scroll offset for a body area of `width` x `height`:
/// the one that puts the last wrapped row on the bottom edge.
pub fn max_scroll(result: &PredictionResult, width: u16, height: u16) -> u16 {
    let rows = paragraph(result).line_count(width.min(MAX_CONTENT_WIDTH));
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(height)
}

/// Lines of the loaded view, top to bottom
pub fn prediction_lines(result: &PredictionResult) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let heading = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(result.title(), heading.fg(Color::White))),
        Line::from(Span::styled(
            format!("Nivel: {}", result.level),
            heading.fg(severity_color(result.severity())),
        )),
        Line::default(),
        field_line("Fecha", &result.date, label),
        field_line("Ciudad", &result.city, label),
    ];
    if let Some(percent) = result.prob_percent() {
        lines.push(field_line("Probabilidad", &format!("{percent}%"), label));
    }
    lines.push(field_line("Horas pico", &result.peak_hours_line(), label));

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Razones:", heading)));
    lines.extend(
        result
            .reasons
            .iter()
            .enumerate()
            .map(|(idx, reason)| Line::from(vec![item_marker(idx), Span::raw(reason.clone())])),
    );

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Fuentes:", heading)));
    for (idx, item) in result.evidence.iter().enumerate() {
        let mut spans = vec![item_marker(idx), Span::raw(item.label().to_string())];
        if let Some(url) = item.link() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(LINK_LABEL, Style::default().fg(Color::Cyan).underlined()));
            spans.push(Span::styled(
                format!(" <{url}>"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// Number of logical lines in the loaded view, before wrapping
pub fn line_count(result: &PredictionResult) -> u16 {
    u16::try_from(prediction_lines(result).len()).unwrap_or(u16::MAX)
}

fn field_line(name: &str, value: &str, label: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), label),
        Span::raw(value.to_string()),
    ])
}

fn item_marker(idx: usize) -> Span<'static> {
    Span::styled(format!("  {}. ", idx + 1), Style::default().fg(Color::DarkGray))
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => Color::Rgb(100, 200, 150),
        Severity::Medium => Color::Rgb(255, 220, 100),
        Severity::High => Color::Rgb(255, 180, 80),
        Severity::VeryHigh => Color::Rgb(255, 120, 80),
        Severity::Extreme => Color::Rgb(255, 60, 60),
        Severity::Unknown => Color::Gray,
    }
}
