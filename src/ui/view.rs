use crate::audio::{PlaybackStatus, TrackInfo, Volume};
use crate::controller::{progress_percent, PlayerEvent};
use std::collections::HashMap;
use std::path::PathBuf;

pub const NO_SONG: &str = "No song loaded";

/// Everything the widgets draw. Updated only from [`PlayerEvent`]s.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub rows: Vec<TrackInfo>,
    pub selected: Option<usize>,
    pub label: String,
    pub status: PlaybackStatus,
    /// Seek bar, 0-100.
    pub progress: u16,
    pub elapsed_secs: u64,
    pub duration_secs: u64,
    pub volume: Volume,
    /// Dismissible error popup.
    pub notice: Option<String>,
    /// Rows already read from disk, so a refresh only probes new songs.
    info_cache: HashMap<PathBuf, TrackInfo>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: None,
            label: NO_SONG.to_string(),
            status: PlaybackStatus::Empty,
            progress: 0,
            elapsed_secs: 0,
            duration_secs: 0,
            volume: Volume::default(),
            notice: None,
            info_cache: HashMap::new(),
        }
    }
}

impl ViewState {
    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::LibraryChanged(tracks) => {
                let cache = &mut self.info_cache;
                self.rows = tracks
                    .iter()
                    .map(|t| cache.entry(t.file_path.clone()).or_insert_with(|| t.info()).clone())
                    .collect();
            }
            PlayerEvent::TrackChanged { index, track } => {
                self.selected = Some(index);
                self.label = track.display_name();
                self.progress = 0;
            }
            PlayerEvent::TrackCleared { index } => {
                self.selected = index;
                self.label = NO_SONG.to_string();
                self.progress = 0;
                self.elapsed_secs = 0;
                self.duration_secs = 0;
            }
            PlayerEvent::StatusChanged(status) => self.status = status,
            PlayerEvent::PositionChanged { elapsed, duration } => {
                self.elapsed_secs = elapsed.as_secs();
                self.duration_secs = duration.as_secs();
                // unknown length leaves the bar where it was
                if let Some(percent) = progress_percent(elapsed, duration) {
                    self.progress = percent;
                }
            }
            PlayerEvent::VolumeChanged(volume) => self.volume = volume,
            PlayerEvent::Error(message) => self.notice = Some(message),
        }
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    /// Text for the play/pause button: what pressing it would do.
    pub fn play_button(&self) -> &'static str {
        match self.status {
            PlaybackStatus::Playing => "Pause",
            _ => "Play",
        }
    }
}
