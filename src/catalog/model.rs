use std::ops::Index;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub artist: String,
    pub title: String,
    pub album_art: Option<PathBuf>,
    pub media: PathBuf,
}

/// Non-empty, read-only list of tracks shared for the life of the process.
///
/// Cloning is cheap; every clone sees the same tracks.
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    tracks: Arc<[TrackDescriptor]>,
}

impl TrackCatalog {
    /// Wrap `tracks`, rejecting an empty list.
    pub fn new(tracks: Vec<TrackDescriptor>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            tracks: tracks.into(),
        })
    }

    /// Number of tracks. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackDescriptor> {
        self.tracks.iter()
    }

    /// Index after `index`, wrapping to the start.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// Index before `index`, wrapping to the end.
    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.len() - 1) % self.len()
    }
}

impl Index<usize> for TrackCatalog {
    type Output = TrackDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tracks[index]
    }
}
