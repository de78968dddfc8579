// Local inventory: album folders under the source directory and the files
// inside one album.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How `ExtensionFilter` compares extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// `.JPG` matches `.jpg`.
    #[default]
    Insensitive,
    Sensitive,
}

/// Keeps only files whose extension equals the configured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extension: String,
    case: CaseSensitivity,
}

impl ExtensionFilter {
    /// `extension` may be given with or without its leading dot.
    pub fn new(extension: &str, case: CaseSensitivity) -> Self {
        let extension = extension.trim();
        let extension = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        Self { extension, case }
    }

    /// The extension, always with its leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let candidate = &self.extension[1..];
        match self.case {
            CaseSensitivity::Sensitive => ext == candidate,
            CaseSensitivity::Insensitive => ext.to_lowercase() == candidate.to_lowercase(),
        }
    }

    /// Filter `files`, preserving their order.
    pub fn apply(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        files.into_iter().filter(|f| self.matches(f)).collect()
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List the album folders directly under `source`, sorted by name.
///
/// Dot-prefixed folders are skipped unless `show_hidden` is set. Plain files
/// at the top level are never albums.
pub fn list_album_folders(source: &Path, show_hidden: bool) -> io::Result<Vec<String>> {
    let mut albums = Vec::new();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "Skipping album with non UTF-8 name");
            continue;
        };
        if is_hidden(&name) && !show_hidden {
            continue;
        }
        albums.push(name);
    }
    albums.sort();
    Ok(albums)
}

/// List the regular, non-hidden files of one album folder, sorted by name.
pub fn list_files(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(is_hidden) {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}
