//! Traffic prediction TUI

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use traffic::action::Action;
use traffic::api::PredictionClient;
use traffic::components::{Component, PredictionView, PredictionViewProps};
use traffic::config::{API_BASE_ENV, ApiBase, DEFAULT_CITY, PredictionQuery};
use traffic::effect::Effect;
use traffic::reducer::reducer;
use traffic::state::{AppState, Viewport};

/// Traffic prediction viewer
#[derive(Parser, Debug)]
#[command(name = "traffic")]
#[command(about = "Shows the daily traffic prediction for a city")]
struct Args {
    /// Base URL of the prediction service [default: http://localhost:8000]
    #[arg(long, env = API_BASE_ENV)]
    api_base: Option<String>,

    /// City identifier sent to the service
    #[arg(long, short, default_value = DEFAULT_CITY)]
    city: String,

    /// Date to predict (YYYY-MM-DD), today on the local clock if omitted
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Diagnostic log file (used while the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum TrafficComponentId {
    View,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum TrafficContext {
    Main,
}

impl EventRoutingState<TrafficComponentId, TrafficContext> for AppState {
    fn focused(&self) -> Option<TrafficComponentId> {
        Some(TrafficComponentId::View)
    }

    fn modal(&self) -> Option<TrafficComponentId> {
        None
    }

    fn binding_context(&self, _id: TrafficComponentId) -> TrafficContext {
        TrafficContext::Main
    }

    fn default_context(&self) -> TrafficContext {
        TrafficContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        city,
        date,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);
    let use_alt_screen = debug.use_alt_screen();
    init_logging(use_alt_screen, log_file)?;

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let client = Arc::new(PredictionClient::new(ApiBase::resolve(api_base.as_deref())));
    let query = match date {
        Some(date) => PredictionQuery::new(date, &city),
        None => PredictionQuery::today(&city),
    };
    tracing::info!(base = %client.base(), date = %query.date, city = %query.city, "starting");

    let mut state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(query))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    // ===== Terminal setup =====
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    state.viewport = Some(Viewport {
        width: size.width,
        height: size.height,
    });

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let result = run_app(&mut terminal, &debug, store, replay_actions, client).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Logs go to stderr unless the TUI owns the terminal, then to a file.
fn init_logging(use_alt_screen: bool, log_file: Option<PathBuf>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        None if !use_alt_screen => builder.with_writer(io::stderr).init(),
        log_file => {
            let path = log_file.unwrap_or_else(|| std::env::temp_dir().join("traffic.log"));
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
    }
    Ok(())
}

struct TrafficUi {
    view: PredictionView,
}

impl TrafficUi {
    fn new() -> Self {
        Self {
            view: PredictionView,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<TrafficComponentId>,
    ) {
        event_ctx.set_component_area(TrafficComponentId::View, area);

        let props = PredictionViewProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.view.render(frame, area, props);
    }

    fn handle_view_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = PredictionViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.view.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: Arc<PredictionClient>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(TrafficUi::new()));
    let mut bus: EventBus<AppState, Action, TrafficComponentId, TrafficContext> = EventBus::new();
    let keybindings: Keybindings<TrafficContext> = Keybindings::new();

    let ui_view = Rc::clone(&ui);
    bus.register(TrafficComponentId::View, move |event, state| {
        ui_view.borrow_mut().handle_view_event(&event.kind, state)
    });

    // Scroll limits depend on the terminal size
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::PredictionFetch),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&client)),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: Arc<PredictionClient>) {
    match effect {
        Effect::FetchPrediction { query } => {
            ctx.tasks().spawn("prediction", async move { client.load(&query).await });
        }
    }
}
