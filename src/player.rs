//! Playback controller: the state machine tying track navigation to the
//! lifecycle of the current audio handle.

mod controller;
mod intent;
mod view;

pub use controller::PlaybackController;
pub use intent::Intent;
pub use view::{ControlIcon, NowPlaying, Status};
