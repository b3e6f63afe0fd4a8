use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::audio::{HandleEvent, RodioEngine};
use crate::error::AppError;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::player::PlaybackController;

mod event_loop;
mod settings;
mod startup;


pub fn run() -> Result<(), AppError> {
    let settings = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(Some(path)) => info!(log = %path.display(), "allegro starting"),
        Ok(None) => {}
        Err(e) => eprintln!("allegro: logging disabled: {e}"),
    }

    // An unusable catalog stops us before the terminal is touched.
    let catalog = startup::load_catalog(env::args().nth(1), &settings)?;

    let (audio_tx, audio_rx) = mpsc::channel::<HandleEvent>();
    let engine = RodioEngine::open(audio_tx, &settings.audio)?;

    let mut controller = PlaybackController::new(catalog, engine);
    controller.start();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut controller,
        &mpris,
        &control_tx,
        &control_rx,
        &audio_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("allegro exiting");
    run_result
}
