use super::{AudioFormat, Track};
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Finds audio files for the add-song dialog.
#[derive(Clone)]
pub struct MusicScanner {
    max_entries: usize,
}

impl MusicScanner {
    pub fn new() -> Self {
        Self { max_entries: 10_000 }
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self { max_entries }
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, path: P) -> Vec<Track> {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(path.as_ref())
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if tracks.len() >= self.max_entries {
                debug!("Scan of {} capped at {} entries", path.as_ref().display(), self.max_entries);
                break;
            }

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            // Skip hidden files (dotfiles)
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.'))
            {
                continue;
            }

            // Skip empty files
            if let Ok(metadata) = fs::metadata(path) {
                if metadata.len() == 0 {
                    continue;
                }
            }

            if Self::is_supported_file(path) {
                tracks.push(Track::new(path.to_path_buf()));
            }
        }

        tracks
    }

    pub fn is_supported_file(path: &Path) -> bool {
        AudioFormat::from_path(path).is_supported()
    }
}

impl Default for MusicScanner {
    fn default() -> Self {
        Self::new()
    }
}
