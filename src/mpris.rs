//! MPRIS (D-Bus) control surface so media keys and `playerctl` can drive the player.
//!
//! The D-Bus side only reads a snapshot of the current display state and turns
//! method calls into [`ControlCmd`]s for the runtime; it never touches the
//! controller directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::player::{Intent, NowPlaying, Status};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Commands coming from any control surface (keyboard or D-Bus).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Transport(Intent),
    /// Play only if currently paused.
    Play,
    /// Pause only if currently playing.
    Pause,
    Quit,
}

#[derive(Debug, Default)]
struct SharedState {
    status: Status,
    title: Option<String>,
    artist: Vec<String>,
    art_url: Option<String>,
    length_micros: Option<u64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// Publish the current display state.
    pub fn set_now_playing(&self, np: &NowPlaying) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        s.status = np.status;
        s.title = Some(np.title.clone());
        s.artist = vec![np.artist.clone()];
        s.art_url = np
            .album_art
            .as_ref()
            .map(|p| format!("file://{}", p.display()));
        s.length_micros = np.length_micros;
        s.track_id = ObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", np.index))
            .ok()
            .map(OwnedObjectPath::from);
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "allegro"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

/// MPRIS has no notion of loading or failure; both read as stopped.
fn playback_status_str(status: Status) -> &'static str {
    match status {
        Status::Playing => "Playing",
        Status::Paused => "Paused",
        Status::Idle | Status::Loading => "Stopped",
    }
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Transport(Intent::Next));
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Transport(Intent::Previous));
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::Transport(Intent::TogglePlayPause));
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    /// There is no stopped state to go to; stopping pauses.
    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        playback_status_str(s.status)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put(
            "mpris:trackid",
            s.track_id
                .as_ref()
                .and_then(|p| owned(Value::from(p.clone().into_inner()))),
        );
        put(
            "xesam:title",
            s.title.clone().and_then(|t| owned(Value::from(t))),
        );
        if !s.artist.is_empty() {
            put("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        put(
            "mpris:artUrl",
            s.art_url.clone().and_then(|u| owned(Value::from(u))),
        );
        put(
            "mpris:length",
            s.length_micros
                .and_then(|l| owned(Value::from(l.min(i64::MAX as u64) as i64))),
        );
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.allegro")
                .await
            {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            info!("MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
