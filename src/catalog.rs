//! The track catalog: an ordered, immutable list of tracks built once at startup.
//!
//! Tracks come either from a TOML manifest or from scanning a music directory.

mod manifest;
mod model;
mod scan;
mod title;

use std::path::Path;

use crate::config::CatalogSettings;
use crate::error::CatalogError;

pub use model::{TrackCatalog, TrackDescriptor};

/// Build the catalog from `source`.
///
/// A file is read as a manifest, unless it is itself an audio file. A directory
/// is searched for `settings.manifest_name` first and scanned for audio files
/// otherwise.
pub fn load(source: &Path, settings: &CatalogSettings) -> Result<TrackCatalog, CatalogError> {
    if source.is_file() {
        if scan::is_audio_file(source, settings) {
            return Err(CatalogError::NotAManifest {
                path: source.to_path_buf(),
            });
        }
        return manifest::read_manifest(source, settings);
    }

    let manifest_path = source.join(&settings.manifest_name);
    if manifest_path.is_file() {
        return manifest::read_manifest(&manifest_path, settings);
    }

    if !source.is_dir() {
        return Err(CatalogError::Io {
            path: source.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file or directory",
            ),
        });
    }

    TrackCatalog::new(scan::scan(source, settings))
}
