//! Error types shared across the player.

use std::path::PathBuf;

use thiserror::Error;

/// Problems building the track catalog. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("track catalog is empty")]
    Empty,

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is an audio file, not a catalog manifest; pass its directory instead")]
    NotAManifest { path: PathBuf },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("track {index} is invalid: {reason}")]
    InvalidTrack { index: usize, reason: String },
}

/// A media resource could not be loaded. Reported per handle, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("cannot decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Top-level error returned by the runtime.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
