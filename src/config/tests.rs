use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_allegro_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", "/tmp/allegro-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/allegro-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 0.5

[ui]
header_text = "hello"
show_elapsed = false

[catalog]
path = "/srv/music"
manifest_name = "tracks.toml"
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[logging]
enabled = false
level = "debug"
file = "/tmp/allegro-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ALLEGRO__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_elapsed);
    assert_eq!(
        s.catalog.path.as_deref(),
        Some(std::path::Path::new("/srv/music"))
    );
    assert_eq!(s.catalog.manifest_name, "tracks.toml");
    assert_eq!(s.catalog.extensions, vec!["mp3".to_string()]);
    assert!(!s.catalog.recursive);
    assert!(s.catalog.include_hidden);
    assert!(!s.catalog.follow_links);
    assert_eq!(s.catalog.max_depth, Some(3));
    assert!(!s.logging.enabled);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file_path(),
        std::path::PathBuf::from("/tmp/allegro-test.log")
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[ui]
show_elapsed = true
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ALLEGRO__UI__SHOW_ELAPSED", "false");

    let s = Settings::load().unwrap();
    assert!(!s.ui.show_elapsed);
}

#[test]
fn validate_rejects_out_of_range_volume() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.volume = 3.0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_empty_extension_list() {
    let mut s = Settings::default();
    s.catalog.extensions = vec![" ".into(), ".".into()];
    assert!(s.validate().is_err());
}

#[test]
fn logging_file_defaults_to_temp_dir() {
    let s = LoggingSettings::default();
    assert_eq!(s.file_path(), std::env::temp_dir().join("allegro.log"));
}
