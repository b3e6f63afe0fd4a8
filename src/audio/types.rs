//! The audio handle contract consumed by the playback controller.
//!
//! An engine creates one handle per track. Each handle reports its lifecycle
//! through [`HandleEvent`]s tagged with the handle's [`HandleId`], so events
//! from a handle that has since been replaced can be told apart.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::LoadError;

/// Identity of one handle. Never reused within an engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle notification from a handle.
///
/// Per handle the order is: one of `Loaded`/`Failed`, then any number of
/// `Started`/`Paused`, then at most one `Ended`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Loaded,
    Failed(LoadError),
    Started,
    Paused,
    /// Natural end of playback. Never sent after `stop_and_release`.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleEvent {
    pub id: HandleId,
    pub event: AudioEvent,
}

impl HandleEvent {
    pub fn new(id: HandleId, event: AudioEvent) -> Self {
        Self { id, event }
    }
}

/// One loaded (or loading) audio resource.
pub trait AudioHandle {
    fn id(&self) -> HandleId;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stop playback and drop the underlying resource. Safe to call more than once,
    /// and on a handle that never finished loading.
    fn stop_and_release(&mut self);

    /// Total length, `Duration::ZERO` while unknown.
    fn duration(&self) -> Duration;

    /// Current playback position, `Duration::ZERO` before playback starts.
    fn position(&self) -> Duration;
}

/// Factory for handles. Loading is asynchronous: `create` returns at once and the
/// handle later reports `Loaded` or `Failed`.
pub trait AudioEngine {
    type Handle: AudioHandle;

    fn create(&mut self, media: &Path) -> Self::Handle;
}
