use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::audio::{AudioEngine, HandleEvent};
use crate::config;
use crate::error::AppError;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Intent, NowPlaying, PlaybackController, Status};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Last display state pushed to MPRIS.
    last_published: Option<NowPlaying>,
}

impl EventLoopState {
    /// Everything but the ticking clock is MPRIS-visible.
    pub(super) fn needs_publish(&self, np: &NowPlaying) -> bool {
        match &self.last_published {
            None => true,
            Some(last) => {
                let mut masked = last.clone();
                masked.elapsed.clone_from(&np.elapsed);
                masked != *np
            }
        }
    }

    pub(super) fn mark_published(&mut self, np: &NowPlaying) {
        self.last_published = Some(np.clone());
    }
}

/// Main terminal event loop: feeds handle events and control commands into the
/// controller, keeps MPRIS in sync and redraws. Returns `Ok(())` on quit.
pub fn run<E: AudioEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut PlaybackController<E>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    audio_rx: &mpsc::Receiver<HandleEvent>,
    state: &mut EventLoopState,
) -> Result<(), AppError> {
    loop {
        while let Ok(ev) = audio_rx.try_recv() {
            controller.handle_event(ev);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                return Ok(());
            }
        }

        controller.tick();

        let np = controller.now_playing();
        if state.needs_publish(np) {
            mpris.set_now_playing(np);
            state.mark_published(np);
        }

        terminal.draw(|f| ui::draw(f, controller.now_playing(), &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = key_to_cmd(key) {
                    let _ = control_tx.send(cmd);
                }
            }
        }
    }
}

/// Apply one command. Returns `true` when the program should exit.
pub(super) fn handle_control_cmd<E: AudioEngine>(
    cmd: ControlCmd,
    controller: &mut PlaybackController<E>,
) -> bool {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Transport(intent) => controller.dispatch(intent),
        ControlCmd::Play => {
            if controller.status() == Status::Paused || !controller.has_handle() {
                controller.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if controller.status() == Status::Playing {
                controller.toggle_play_pause();
            }
        }
        ControlCmd::Quit => {
            info!(index = controller.index(), "quit requested");
            controller.shutdown();
            return true;
        }
    }
    false
}

pub(super) fn key_to_cmd(key: KeyEvent) -> Option<ControlCmd> {
    let cmd = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => ControlCmd::Quit,
        KeyCode::Char('q') | KeyCode::Esc => ControlCmd::Quit,
        KeyCode::Char(' ') | KeyCode::Char('p') => ControlCmd::Transport(Intent::TogglePlayPause),
        KeyCode::Char('h') | KeyCode::Left => ControlCmd::Transport(Intent::Previous),
        KeyCode::Char('l') | KeyCode::Right => ControlCmd::Transport(Intent::Next),
        _ => return None,
    };
    Some(cmd)
}
