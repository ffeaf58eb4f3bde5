pub mod backend;
#[cfg(feature = "audio")]
pub mod player;
pub mod scanner;
pub mod session;
pub mod track;
pub mod volume;

pub use backend::{PlaybackBackend, SilentBackend};
#[cfg(feature = "audio")]
pub use player::RodioBackend;
pub use scanner::MusicScanner;
pub use session::{PlaybackSession, PlaybackStatus, SessionEvent};
pub use track::{Track, TrackInfo};
pub use volume::{Volume, VolumeFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Mp4,
    Wav,
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "flac" => AudioFormat::Flac,
            "ogg" | "oga" => AudioFormat::Ogg,
            "mp4" | "m4a" | "aac" => AudioFormat::Mp4,
            "wav" => AudioFormat::Wav,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .unwrap_or(AudioFormat::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}
