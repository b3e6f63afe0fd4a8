use crate::config;

/// Load and validate settings. Config is optional; any problem falls back to defaults.
///
/// Runs before logging is installed, so complaints go to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("allegro: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("allegro: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
