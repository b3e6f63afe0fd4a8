//! UI rendering helpers for the terminal user interface.
//!
//! The view is a pure function of [`NowPlaying`]: album art reference, track
//! info and the transport row. It never mutates player state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::config::UiSettings;
use crate::player::{ControlIcon, NowPlaying, Status};

const CONTROLS_HELP: &str = "[h/←] previous | [space/p] play/pause | [l/→] next | [q] quit";

fn control_glyph(icon: ControlIcon) -> &'static str {
    match icon {
        ControlIcon::Play => "▶",
        ControlIcon::Pause => "⏸",
    }
}

fn status_text(status: Status) -> &'static str {
    match status {
        Status::Idle => "Stopped",
        Status::Loading => "Loading…",
        Status::Playing => "Playing",
        Status::Paused => "Paused",
    }
}

/// The time line: `elapsed / total`, or just the total.
fn time_text(np: &NowPlaying, ui: &UiSettings) -> String {
    if ui.show_elapsed {
        format!("{} / {}", np.elapsed, np.duration)
    } else {
        np.duration.clone()
    }
}

fn album_art_text(np: &NowPlaying) -> String {
    match &np.album_art {
        Some(path) => path.display().to_string(),
        None => "(no album art)".to_string(),
    }
}

/// Render the player into `frame`.
pub fn draw(frame: &mut Frame, np: &NowPlaying, ui: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" allegro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let art = Paragraph::new(album_art_text(np))
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" album art "))
        .wrap(Wrap { trim: true });
    frame.render_widget(art, chunks[1]);

    let mut info_lines = vec![
        Line::from(Span::styled(
            np.artist.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(np.title.as_str()),
        Line::from(time_text(np, ui)),
        Line::from(format!(
            "{} • track {}/{}",
            status_text(np.status),
            np.index + 1,
            np.track_count
        )),
    ];
    if let Some(err) = &np.error {
        info_lines.push(Line::from(err.as_str().red()));
    }
    let info = Paragraph::new(info_lines)
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                })
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(info, chunks[2]);

    let transport = Paragraph::new(format!(
        "⏮    {}    ⏭",
        control_glyph(np.control_icon())
    ))
    .alignment(Alignment::Center)
    .block(Block::bordered().title(" controls "));
    frame.render_widget(transport, chunks[3]);

    let footer = Paragraph::new(CONTROLS_HELP)
        .block(Block::default().borders(Borders::ALL).padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        }))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use std::path::PathBuf;

    fn np(status: Status) -> NowPlaying {
        NowPlaying {
            index: 1,
            track_count: 3,
            status,
            artist: "Boards of Canada".to_string(),
            title: "Roygbiv".to_string(),
            album_art: Some(PathBuf::from("art/mhtrtc.jpg")),
            duration: "02:31".to_string(),
            elapsed: "00:12".to_string(),
            length_micros: Some(151_000_000),
            error: None,
        }
    }

    fn render(np: &NowPlaying, ui: &UiSettings) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, np, ui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_track_info_and_pause_glyph_while_playing() {
        let screen = render(&np(Status::Playing), &UiSettings::default());
        assert!(screen.contains("Boards of Canada"));
        assert!(screen.contains("Roygbiv"));
        assert!(screen.contains("00:12 / 02:31"));
        assert!(screen.contains("track 2/3"));
        assert!(screen.contains("art/mhtrtc.jpg"));
        assert!(screen.contains("⏸"));
        assert!(!screen.contains("▶"));
    }

    #[test]
    fn shows_total_only_when_elapsed_is_disabled() {
        let ui = UiSettings {
            show_elapsed: false,
            ..UiSettings::default()
        };
        let screen = render(&np(Status::Paused), &ui);
        assert!(screen.contains("02:31"));
        assert!(!screen.contains("00:12"));
        assert!(screen.contains("▶"));
    }

    #[test]
    fn shows_error_and_placeholder_art() {
        let mut state = np(Status::Idle);
        state.album_art = None;
        state.error = Some("cannot open x.mp3".to_string());
        let screen = render(&state, &UiSettings::default());
        assert!(screen.contains("(no album art)"));
        assert!(screen.contains("cannot open x.mp3"));
        assert!(screen.contains("Stopped"));
    }
}
