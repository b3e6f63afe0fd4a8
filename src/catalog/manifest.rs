use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config::CatalogSettings;
use crate::error::CatalogError;

use super::model::{TrackCatalog, TrackDescriptor};
use super::title::clean_title;

/// On-disk manifest layout:
///
/// ```toml
/// [[track]]
/// artist = "Artist"
/// title = "Song"            # optional, derived from `media` when absent
/// media = "music/song.mp3"
/// album_art = "art/song.jpg"
/// ```
///
/// Relative paths resolve against the manifest's directory.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "track")]
    tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Deserialize)]
struct ManifestTrack {
    artist: String,
    title: Option<String>,
    media: PathBuf,
    album_art: PathBuf,
}

pub(super) fn read_manifest(
    path: &Path,
    settings: &CatalogSettings,
) -> Result<TrackCatalog, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let tracks = parse_manifest(&text, base, settings).map_err(|e| match e {
        ManifestError::Parse(source) => CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ManifestError::Catalog(e) => e,
    })?;

    debug!(path = %path.display(), tracks = tracks.len(), "read catalog manifest");
    TrackCatalog::new(tracks)
}

#[derive(Debug)]
enum ManifestError {
    Parse(toml::de::Error),
    Catalog(CatalogError),
}

fn parse_manifest(
    text: &str,
    base: &Path,
    settings: &CatalogSettings,
) -> Result<Vec<TrackDescriptor>, ManifestError> {
    let manifest: Manifest = toml::from_str(text).map_err(ManifestError::Parse)?;

    manifest
        .tracks
        .into_iter()
        .enumerate()
        .map(|(index, t)| {
            if t.media.as_os_str().is_empty() {
                return Err(ManifestError::Catalog(CatalogError::InvalidTrack {
                    index,
                    reason: "media path is empty".to_string(),
                }));
            }
            if t.album_art.as_os_str().is_empty() {
                return Err(ManifestError::Catalog(CatalogError::InvalidTrack {
                    index,
                    reason: "album_art path is empty".to_string(),
                }));
            }

            let artist = t.artist.trim();
            let media = base.join(&t.media);
            Ok(TrackDescriptor {
                artist: if artist.is_empty() { "-" } else { artist }.to_string(),
                title: clean_title(t.title.as_deref(), &media, &settings.extensions),
                album_art: Some(base.join(&t.album_art)),
                media,
            })
        })
        .collect()
}
