// Error types shared across the player
// Each concern gets its own enum so callers can tell "already there" from "broken"

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures from the track store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Already exists: {}", .0.display())]
    DuplicateTrack(PathBuf),

    #[error("Not a usable track path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Track store error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Track store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A track could not be bound to the playback session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open audio file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported audio format or corrupted file {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Audio output unavailable: {0}")]
    Output(String),
}

impl LoadError {
    /// Classify an `open()` failure for `path`.
    pub fn from_open(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path)
        } else {
            LoadError::Io { path, source }
        }
    }
}

#[derive(Debug, Error)]
pub enum SeekError {
    #[error("Nothing loaded to seek in")]
    NothingLoaded,

    #[error("Seek not supported: {0}")]
    Unsupported(String),
}

/// Why the stored volume could not be used. Every variant is recovered from.
#[derive(Debug, Error)]
pub enum VolumeFileError {
    #[error("volume file does not exist")]
    Missing,

    #[error("volume file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("volume file is not an integer: {0}")]
    Parse(#[from] ParseIntError),

    #[error("volume {0} outside 0..=100")]
    OutOfRange(i64),
}
