use std::path::PathBuf;

use tracing::{debug, info};

use crate::catalog::{self, TrackCatalog};
use crate::config;
use crate::error::CatalogError;

/// Pick the catalog source: command-line argument, then `catalog.path`, then the
/// current directory.
pub fn catalog_source(arg: Option<String>, settings: &config::Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.catalog.path.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_catalog(
    arg: Option<String>,
    settings: &config::Settings,
) -> Result<TrackCatalog, CatalogError> {
    let source = catalog_source(arg, settings);
    let catalog = catalog::load(&source, &settings.catalog)?;
    info!(source = %source.display(), tracks = catalog.len(), "catalog loaded");
    for (i, track) in catalog.iter().enumerate() {
        debug!(index = i, artist = %track.artist, title = %track.title, media = %track.media.display());
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_configured_path() {
        let mut settings = config::Settings::default();
        settings.catalog.path = Some(PathBuf::from("/configured"));

        assert_eq!(
            catalog_source(Some("/from/cli".into()), &settings),
            PathBuf::from("/from/cli")
        );
        assert_eq!(catalog_source(None, &settings), PathBuf::from("/configured"));
    }

    #[test]
    fn falls_back_to_current_dir() {
        let settings = config::Settings::default();
        assert_eq!(
            catalog_source(None, &settings),
            std::env::current_dir().unwrap()
        );
    }

    #[test]
    fn empty_directory_is_a_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = config::Settings::default();
        let arg = dir.path().to_str().map(str::to_string);
        assert!(matches!(
            load_catalog(arg, &settings),
            Err(CatalogError::Empty)
        ));
    }
}
