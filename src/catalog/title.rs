use std::path::Path;

/// Strip a trailing audio extension (case-insensitive) from `name`.
///
/// Only extensions listed in `extensions` are removed, so dotted titles like
/// `"Vol. 2"` survive.
pub fn strip_audio_extension<'a>(name: &'a str, extensions: &[String]) -> &'a str {
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() || name.len() <= ext.len() + 1 {
            continue;
        }
        let split = name.len() - ext.len();
        if !name.is_char_boundary(split - 1) {
            continue;
        }
        let (stem, tail) = name.split_at(split - 1);
        if tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(ext) {
            return stem;
        }
    }
    name
}

/// Title to show when the metadata has none: the media file name without its extension.
pub fn title_from_media(media: &Path, extensions: &[String]) -> String {
    let name = media
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let title = strip_audio_extension(name, extensions).trim();
    if title.is_empty() {
        "UNKNOWN".to_string()
    } else {
        title.to_string()
    }
}

/// Prefer `title` when it carries text, otherwise derive one from the file name.
pub fn clean_title(title: Option<&str>, media: &Path, extensions: &[String]) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => strip_audio_extension(t, extensions).to_string(),
        None => title_from_media(media, extensions),
    }
}
