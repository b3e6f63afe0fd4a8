//! `tracing` setup. The terminal belongs to the TUI, so logs go to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter {0:?}")]
    Filter(String),

    #[error("logger already installed")]
    AlreadyInstalled,
}

/// Filter from `RUST_LOG` when set, otherwise from the configured level.
fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|_| LoggingError::Filter(settings.level.clone()))
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging is disabled.
pub fn init(settings: &LoggingSettings) -> Result<Option<PathBuf>, LoggingError> {
    if !settings.enabled {
        return Ok(None);
    }

    let filter = build_filter(settings)?;
    let path = settings.file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::Open {
            path: path.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_installs_nothing() {
        let settings = LoggingSettings {
            enabled: false,
            ..LoggingSettings::default()
        };
        assert!(init(&settings).unwrap().is_none());
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            file: Some(dir.path().join("missing-dir").join("allegro.log")),
            ..LoggingSettings::default()
        };
        assert!(matches!(init(&settings), Err(LoggingError::Open { .. })));
    }
}
