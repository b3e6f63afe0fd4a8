//! Display fields derived from the controller after every transition.

use std::path::PathBuf;
use std::time::Duration;

/// Shown wherever a duration is not known (yet).
pub const UNKNOWN_TIME: &str = "--:--";
/// Shown in place of text that could not be produced.
pub const PLACEHOLDER: &str = "-";

/// Where the controller is in a track's lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    /// No handle: before `start`, or after a load failure.
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
}

/// Which glyph the play/pause control shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlIcon {
    Play,
    Pause,
}

/// Everything a view needs to render the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlaying {
    pub index: usize,
    pub track_count: usize,
    pub status: Status,
    pub artist: String,
    pub title: String,
    pub album_art: Option<PathBuf>,
    /// Total length as `MM:SS`, or `--:--`.
    pub duration: String,
    /// Playback position as `MM:SS`, or `--:--` until loaded.
    pub elapsed: String,
    /// Total length in whole microseconds, when known.
    pub length_micros: Option<u64>,
    /// Load failure for the current track, if any.
    pub error: Option<String>,
}

impl NowPlaying {
    /// The control offers to pause while playing and to play otherwise.
    pub fn control_icon(&self) -> ControlIcon {
        match self.status {
            Status::Playing => ControlIcon::Pause,
            _ => ControlIcon::Play,
        }
    }
}

/// Format `d` as zero-padded `MM:SS`, dropping sub-second parts.
///
/// Minutes are not capped: 100 minutes render as `100:00`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Like [`format_mmss`] but renders `None` as `--:--`.
pub fn format_known(d: Option<Duration>) -> String {
    d.map(format_mmss)
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}
