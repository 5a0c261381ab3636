mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::loader::{DataSource, LoaderWorker};
use crate::state::messages::{LoadRequest, LoadResponse, UiEvent};
use crossterm::event::{self as crossterm_event, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::{cursor, execute, terminal};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// Scroll easing tick, ~30 FPS.
const ANIMATION_TICK: Duration = Duration::from_millis(33);

enum CliAction {
    Exit,
    Run { data_path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_path = match handle_cli_args() {
        CliAction::Exit => return Ok(()),
        CliAction::Run { data_path } => data_path,
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let mut app = App::new();
    if data_path.is_some() {
        app.settings.data_path = data_path;
    }
    let source = DataSource::from_path(app.settings.data_path.clone());
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (load_req_tx, load_req_rx) = mpsc::channel::<LoadRequest>(10);
    let (load_resp_tx, load_resp_rx) = mpsc::channel::<LoadResponse>(10);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Loader thread
    let loader = LoaderWorker::new(source, load_req_rx, load_resp_tx);
    let loader_task = tokio::spawn(loader.run());

    // Animation tick thread: drives snap easing
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(ANIMATION_TICK);
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    // Trigger bracket load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, load_req_tx, load_resp_rx).await;

    input_handler.abort();
    loader_task.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliAction {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return CliAction::Run { data_path: None };
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliAction::Exit
        }
        "-V" | "--version" => {
            println!("bracketview {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit
        }
        path if !path.starts_with('-') => CliAction::Run { data_path: Some(PathBuf::from(path)) },
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "bracketview - scrollable single-elimination bracket

Usage:
  bracketview [BRACKET_JSON]
  bracketview --help
  bracketview --version

Environment:
  BRACKETVIEW_JSON               Path to a bracket JSON file (default: built-in fixture)
  BRACKETVIEW_LOG_LEVEL          error|warn|info|debug|trace (default error)
  BRACKETVIEW_THEME              dark|light (default dark)
  BRACKETVIEW_PERMISSIVE_WINNERS Ignore winner labels that match neither player
  BRACKETVIEW_STRICT_SHAPE       Require each round to halve the previous one"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    load_requests: mpsc::Sender<LoadRequest>,
    mut load_responses: mpsc::Receiver<LoadResponse>,
) {
    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &load_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard);
                }
            }

            Some(response) = load_responses.recv() => {
                handle_load_response(response, &app).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard);
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    load_requests: &mpsc::Sender<LoadRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = load_requests.send(LoadRequest::LoadBracket).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, load_requests).await;
            true
        }
        UiEvent::Mouse(mouse_event) => keys::handle_mouse(mouse_event, app).await,
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            guard.advance_animation()
        }
    }
}

async fn handle_load_response(response: LoadResponse, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    match response {
        LoadResponse::BracketLoaded { tournament, source } => {
            guard.on_bracket_loaded(tournament, source);
        }
        LoadResponse::Error { message } => guard.on_error(message),
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Mouse(mouse_event) => Some(UiEvent::Mouse(mouse_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, EnableMouseCapture)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: called from the quit key and the panic hook, where there is
/// nobody left to report a failure to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, DisableMouseCapture);
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
