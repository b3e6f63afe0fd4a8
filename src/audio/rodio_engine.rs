//! `rodio`-backed implementation of the audio handle contract.
//!
//! Every handle gets a worker thread that opens and decodes the file, parks a
//! paused `Sink` in the handle's slot, reports `Loaded`, then waits for the sink
//! to drain so it can report `Ended`. Releasing a handle marks the slot so the
//! worker neither installs a late sink nor reports a stop as a natural end.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lofty::prelude::*;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::config::AudioSettings;
use crate::error::LoadError;

use super::types::{AudioEngine, AudioEvent, AudioHandle, HandleEvent, HandleId};

pub struct RodioEngine {
    stream: OutputStream,
    events: Sender<HandleEvent>,
    next_id: u64,
    volume: f32,
}

impl RodioEngine {
    /// Open the default output device. Handle events are sent to `events`.
    pub fn open(
        events: Sender<HandleEvent>,
        settings: &AudioSettings,
    ) -> Result<Self, rodio::StreamError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped, which would scribble over the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            events,
            next_id: 0,
            volume: settings.volume,
        })
    }
}

impl AudioEngine for RodioEngine {
    type Handle = RodioHandle;

    fn create(&mut self, media: &Path) -> RodioHandle {
        let id = HandleId(self.next_id);
        self.next_id += 1;

        let slot = Arc::new(Mutex::new(Slot::default()));
        spawn_loader(Loader {
            id,
            path: media.to_path_buf(),
            mixer: self.stream.mixer().clone(),
            volume: self.volume,
            slot: slot.clone(),
            events: self.events.clone(),
        });

        RodioHandle {
            id,
            slot,
            events: self.events.clone(),
        }
    }
}

#[derive(Default)]
pub(super) struct Slot {
    released: bool,
    sink: Option<Arc<Sink>>,
    duration: Duration,
}

impl Slot {
    /// Park a decoded sink. Returns `false`, leaving the slot empty, when the
    /// handle was released while decoding.
    pub(super) fn install(&mut self, sink: Arc<Sink>, duration: Duration) -> bool {
        if self.released {
            return false;
        }
        self.sink = Some(sink);
        self.duration = duration;
        true
    }

    /// Mark the slot released and stop its sink. Returns `false` if it already was.
    pub(super) fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        true
    }

    /// A drained sink counts as a natural end only if nobody released it.
    pub(super) fn ended_naturally(&self) -> bool {
        !self.released
    }

    #[cfg(test)]
    pub(super) fn sink(&self) -> Option<Arc<Sink>> {
        self.sink.clone()
    }
}

pub struct RodioHandle {
    id: HandleId,
    slot: Arc<Mutex<Slot>>,
    events: Sender<HandleEvent>,
}

impl RodioHandle {
    fn sink(&self) -> Option<Arc<Sink>> {
        self.slot.lock().ok().and_then(|s| s.sink.clone())
    }

    fn emit(&self, event: AudioEvent) {
        let _ = self.events.send(HandleEvent::new(self.id, event));
    }
}

impl AudioHandle for RodioHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn play(&mut self) {
        match self.sink() {
            Some(sink) => {
                sink.play();
                self.emit(AudioEvent::Started);
            }
            None => debug!(handle = %self.id, "play ignored, nothing loaded"),
        }
    }

    fn pause(&mut self) {
        match self.sink() {
            Some(sink) => {
                sink.pause();
                self.emit(AudioEvent::Paused);
            }
            None => debug!(handle = %self.id, "pause ignored, nothing loaded"),
        }
    }

    fn stop_and_release(&mut self) {
        let released = self.slot.lock().map(|mut s| s.release()).unwrap_or(false);
        if released {
            debug!(handle = %self.id, "released");
        }
    }

    fn duration(&self) -> Duration {
        self.slot.lock().map(|s| s.duration).unwrap_or_default()
    }

    fn position(&self) -> Duration {
        self.sink().map(|s| s.get_pos()).unwrap_or_default()
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.stop_and_release();
    }
}

pub(super) struct Loader {
    pub(super) id: HandleId,
    pub(super) path: PathBuf,
    pub(super) mixer: Mixer,
    pub(super) volume: f32,
    pub(super) slot: Arc<Mutex<Slot>>,
    pub(super) events: Sender<HandleEvent>,
}

fn spawn_loader(loader: Loader) {
    thread::spawn(move || run_loader(loader));
}

/// Body of a handle's worker thread. Blocks until the sink drains or is stopped.
pub(super) fn run_loader(loader: Loader) {
    let Loader {
        id,
        path,
        mixer,
        volume,
        slot,
        events,
    } = loader;

    let (source, duration) = match open_source(&path) {
        Ok(v) => v,
        Err(e) => {
            warn!(handle = %id, error = %e, "load failed");
            let _ = events.send(HandleEvent::new(id, AudioEvent::Failed(e)));
            return;
        }
    };

    let sink = Arc::new(Sink::connect_new(&mixer));
    sink.set_volume(volume);
    sink.pause();
    sink.append(source);

    let installed = slot
        .lock()
        .map(|mut s| s.install(sink.clone(), duration))
        .unwrap_or(false);
    if !installed {
        // Disowned while decoding.
        sink.stop();
        debug!(handle = %id, "dropping load for released handle");
        return;
    }

    debug!(handle = %id, path = %path.display(), ?duration, "loaded");
    let _ = events.send(HandleEvent::new(id, AudioEvent::Loaded));

    sink.sleep_until_end();

    let natural = slot.lock().map(|s| s.ended_naturally()).unwrap_or(false);
    if natural {
        let _ = events.send(HandleEvent::new(id, AudioEvent::Ended));
    }
}

/// Open and decode `path`, returning the source and its total length.
///
/// Decoders that cannot tell their length up front (VBR mp3, mostly) fall back
/// to the container properties read by `lofty`.
pub(super) fn open_source(path: &Path) -> Result<(Decoder<BufReader<File>>, Duration), LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| LoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let duration = source
        .total_duration()
        .or_else(|| {
            lofty::read_from_path(path)
                .ok()
                .map(|tagged| tagged.properties().duration())
        })
        .unwrap_or_default();

    Ok((source, duration))
}
