use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::audio::{AudioEngine, AudioEvent, AudioHandle, HandleEvent};
use crate::catalog::TrackCatalog;
use crate::error::LoadError;

use super::intent::Intent;
use super::view::{NowPlaying, PLACEHOLDER, Status, UNKNOWN_TIME, format_known, format_mmss};

/// The playback / track-navigation state machine.
///
/// Owns the current track index, at most one audio handle and the playback
/// status. Intents and handle events are fed in by the runtime; after every
/// transition the display fields in [`NowPlaying`] are re-derived.
pub struct PlaybackController<E: AudioEngine> {
    catalog: TrackCatalog,
    engine: E,
    index: usize,
    status: Status,
    handle: Option<E::Handle>,
    /// Cleared by the first successful load of the session.
    first_load: bool,
    duration: Option<Duration>,
    error: Option<LoadError>,
    view: NowPlaying,
}

impl<E: AudioEngine> PlaybackController<E> {
    pub fn new(catalog: TrackCatalog, engine: E) -> Self {
        let mut controller = Self {
            view: NowPlaying {
                index: 0,
                track_count: catalog.len(),
                status: Status::Idle,
                artist: String::new(),
                title: String::new(),
                album_art: None,
                duration: UNKNOWN_TIME.to_string(),
                elapsed: UNKNOWN_TIME.to_string(),
                length_micros: None,
                error: None,
            },
            catalog,
            engine,
            index: 0,
            status: Status::Idle,
            handle: None,
            first_load: true,
            duration: None,
            error: None,
        };
        controller.refresh();
        controller
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.view
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    /// Begin the session on the first track. Audio does not start until the
    /// user asks for it.
    pub fn start(&mut self) {
        self.index = 0;
        self.load_current();
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Previous => self.skip_previous(),
            Intent::TogglePlayPause => self.toggle_play_pause(),
            Intent::Next => self.skip_next(),
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match (self.status, self.handle.as_mut()) {
            (Status::Paused, Some(h)) => h.play(),
            (Status::Playing, Some(h)) => h.pause(),
            (_, None) => self.load_current(),
            (Status::Loading, Some(_)) => debug!("toggle ignored while loading"),
            (Status::Idle, Some(_)) => {
                // A handle is never kept in Idle; recover by reloading.
                warn!("idle with a live handle, reloading");
                self.load_current();
            }
        }
        self.refresh();
    }

    pub fn skip_next(&mut self) {
        self.index = self.catalog.next_index(self.index);
        self.load_current();
    }

    pub fn skip_previous(&mut self) {
        self.index = self.catalog.prev_index(self.index);
        self.load_current();
    }

    /// Apply a lifecycle event. Events from any handle other than the one
    /// currently owned are dropped.
    pub fn handle_event(&mut self, event: HandleEvent) {
        let owned = self.handle.as_ref().map(|h| h.id());
        if owned != Some(event.id) {
            trace!(handle = %event.id, event = ?event.event, "stale event ignored");
            return;
        }

        match event.event {
            AudioEvent::Loaded => self.on_loaded(),
            AudioEvent::Failed(e) => self.on_failed(e),
            AudioEvent::Started => self.status = Status::Playing,
            AudioEvent::Paused => self.status = Status::Paused,
            AudioEvent::Ended => {
                info!(index = self.index, "track ended, advancing");
                self.skip_next();
                return;
            }
        }
        self.refresh();
    }

    /// Re-derive the elapsed time; called periodically by the runtime.
    pub fn tick(&mut self) {
        if matches!(self.status, Status::Playing | Status::Paused) {
            self.refresh();
        }
    }

    /// Release the current handle for good.
    pub fn shutdown(&mut self) {
        self.release_current();
        self.status = Status::Idle;
        self.refresh();
    }

    fn on_loaded(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        let duration = handle.duration();
        self.duration = (!duration.is_zero()).then_some(duration);

        if self.first_load {
            self.first_load = false;
            self.status = Status::Paused;
        } else {
            handle.play();
            self.status = Status::Playing;
        }
        debug!(index = self.index, status = ?self.status, "track loaded");
    }

    fn on_failed(&mut self, error: LoadError) {
        warn!(index = self.index, %error, "track failed to load");
        self.release_current();
        self.status = Status::Idle;
        self.error = Some(error);
    }

    /// Tear down whatever is playing and request the track at `self.index`.
    fn load_current(&mut self) {
        self.release_current();

        let media = &self.catalog[self.index].media;
        let handle = self.engine.create(media);
        debug!(index = self.index, handle = %handle.id(), media = %media.display(), "loading");

        self.handle = Some(handle);
        self.status = Status::Loading;
        self.duration = None;
        self.error = None;
        self.refresh();
    }

    fn release_current(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop_and_release();
        }
    }

    fn refresh(&mut self) {
        let track = &self.catalog[self.index];
        let loaded = matches!(self.status, Status::Playing | Status::Paused);

        let elapsed = match self.handle.as_ref() {
            Some(h) if loaded => format_mmss(h.position()),
            _ => UNKNOWN_TIME.to_string(),
        };

        let failed = self.error.is_some();
        self.view = NowPlaying {
            index: self.index,
            track_count: self.catalog.len(),
            status: self.status,
            artist: track.artist.clone(),
            title: if failed {
                PLACEHOLDER.to_string()
            } else {
                track.title.clone()
            },
            album_art: track.album_art.clone(),
            duration: if failed {
                UNKNOWN_TIME.to_string()
            } else {
                format_known(self.duration)
            },
            elapsed,
            length_micros: self
                .duration
                .map(|d| d.as_micros().min(u64::MAX as u128) as u64),
            error: self.error.as_ref().map(|e| e.to_string()),
        };
    }
}
