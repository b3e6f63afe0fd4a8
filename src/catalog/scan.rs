use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::model::TrackDescriptor;
use super::title::clean_title;

/// Image names checked next to an audio file, in order.
const COVER_NAMES: &[&str] = &[
    "cover.jpg",
    "cover.png",
    "folder.jpg",
    "folder.png",
    "front.jpg",
    "front.png",
];

const UNKNOWN_ARTIST: &str = "Unknown artist";

pub(super) fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn find_cover(dir: &Path) -> Option<PathBuf> {
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Walk `dir` and build a descriptor for every audio file found.
///
/// Tracks are ordered by `artist - title`, case-insensitively.
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Vec<TrackDescriptor> {
    let mut tracks: Vec<TrackDescriptor> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let mut tag_title: Option<String> = None;
        let mut artist: Option<String> = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    tag_title = tag.title().map(|v| v.into_owned());
                    artist = tag
                        .artist()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty());
                }
            }
            Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
        }

        let album_art = path.parent().and_then(find_cover);

        tracks.push(TrackDescriptor {
            artist: artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            title: clean_title(tag_title.as_deref(), path, &settings.extensions),
            album_art,
            media: path.to_path_buf(),
        });
    }

    if tracks.is_empty() {
        warn!(dir = %dir.display(), "no audio files found");
    }

    tracks.sort_by_key(|t| format!("{} - {}", t.artist, t.title).to_lowercase());
    tracks
}
