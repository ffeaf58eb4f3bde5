// Controller - owns the store, the cursor and the playback session
// and keeps the three pointing at the same song.
//
// The UI talks to it through method calls and listens through PlayerEvent
// messages; nothing here knows about the terminal.

use crate::audio::{PlaybackBackend, PlaybackSession, PlaybackStatus, SessionEvent, Track, Volume, VolumeFile};
use crate::error::StoreError;
use crate::library::TrackStore;
use crate::navigation::{Direction, Navigator};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    LibraryChanged(Vec<Track>),
    TrackChanged { index: usize, track: Track },
    /// Nothing is loaded; the UI shows its neutral state. `index` is the
    /// cursor, which still moves when a song fails to load.
    TrackCleared { index: Option<usize> },
    StatusChanged(PlaybackStatus),
    PositionChanged { elapsed: Duration, duration: Duration },
    VolumeChanged(Volume),
    Error(String),
}

pub struct Controller<B> {
    store: TrackStore,
    tracks: Vec<Track>,
    navigator: Navigator,
    session: PlaybackSession<B>,
    volume_file: VolumeFile,
    event_sender: Option<mpsc::UnboundedSender<PlayerEvent>>,
}

impl<B: PlaybackBackend> Controller<B> {
    /// Restore volume, read the store and cue up the first song (paused).
    pub fn new(store: TrackStore, mut backend: B, volume_file: VolumeFile) -> Result<Self, StoreError> {
        let volume = volume_file.load_or(backend.volume());
        backend.set_volume(volume);
        info!("Starting with volume {}", volume);

        let mut controller = Self {
            store,
            tracks: Vec::new(),
            navigator: Navigator::new(),
            session: PlaybackSession::new(backend),
            volume_file,
            event_sender: None,
        };
        controller.reload_tracks()?;
        controller.cue_initial();
        Ok(controller)
    }

    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<PlayerEvent>) {
        self.event_sender = Some(sender);
        // late subscribers still need the current picture
        self.emit(PlayerEvent::LibraryChanged(self.tracks.clone()));
        match self.current() {
            Some((index, track)) if self.session.target().is_some() => {
                let track = track.clone();
                self.emit(PlayerEvent::TrackChanged { index, track });
            }
            _ => self.emit(PlayerEvent::TrackCleared { index: self.navigator.current() }),
        }
        self.emit(PlayerEvent::StatusChanged(self.session.status()));
        self.emit(PlayerEvent::VolumeChanged(self.volume()));
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }

    fn reload_tracks(&mut self) -> Result<(), StoreError> {
        self.tracks = self.store.list()?;
        debug!("Store holds {} tracks", self.tracks.len());
        self.emit(PlayerEvent::LibraryChanged(self.tracks.clone()));
        Ok(())
    }

    fn cue_initial(&mut self) {
        match self.navigator.select_initial(self.tracks.len()) {
            Some(index) => self.retarget(index, false),
            None => {
                self.session.unload();
                self.emit(PlayerEvent::TrackCleared { index: None });
                self.emit(PlayerEvent::StatusChanged(PlaybackStatus::Empty));
            }
        }
    }

    /// Point the session at `tracks[index]`, optionally starting it.
    fn retarget(&mut self, index: usize, autoplay: bool) {
        let Some(track) = self.tracks.get(index).cloned() else {
            return;
        };

        match self.session.load(&track.file_path) {
            Ok(()) => {
                if autoplay {
                    self.session.play();
                }
                self.emit(PlayerEvent::TrackChanged { index, track });
            }
            Err(e) => {
                warn!("Could not load {}: {}", track.file_path.display(), e);
                self.emit(PlayerEvent::TrackCleared { index: Some(index) });
                self.emit(PlayerEvent::Error(e.to_string()));
            }
        }
        self.emit(PlayerEvent::StatusChanged(self.session.status()));
        self.emit_position();
    }

    /// Register a new song, then cue the first row again (paused).
    pub fn add_track(&mut self, path: &Path) -> Result<(), StoreError> {
        match self.store.add(path) {
            Ok(_) => {}
            Err(e) => {
                warn!("Add of {} rejected: {}", path.display(), e);
                self.emit(PlayerEvent::Error(e.to_string()));
                return Err(e);
            }
        }

        self.reload_tracks()?;
        self.cue_initial();
        Ok(())
    }

    pub fn next(&mut self) -> Option<usize> {
        self.navigate(Direction::Next)
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.navigate(Direction::Prev)
    }

    fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let index = self.navigator.advance(direction, self.tracks.len())?;
        debug!("Navigate {:?} -> {}", direction, index);
        self.retarget(index, true);
        Some(index)
    }

    pub fn play(&mut self) {
        self.session.play();
        self.emit(PlayerEvent::StatusChanged(self.session.status()));
    }

    pub fn pause(&mut self) {
        self.session.pause();
        self.emit(PlayerEvent::StatusChanged(self.session.status()));
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle();
        self.emit(PlayerEvent::StatusChanged(self.session.status()));
    }

    /// Seek from a 0-100 slider position.
    pub fn seek_percent(&mut self, percent: u8) -> Option<Duration> {
        let fraction = f64::from(percent.min(100)) / 100.0;
        let position = self.session.seek(fraction);
        if position.is_some() {
            self.emit_position();
        }
        position
    }

    pub fn set_volume(&mut self, percent: i64) -> Volume {
        let volume = Volume::clamped(percent);
        self.session.backend_mut().set_volume(volume);
        self.volume_file.store(volume);
        self.emit(PlayerEvent::VolumeChanged(volume));
        volume
    }

    /// Periodic poll: follow end-of-track to the next song and publish the
    /// playhead. At most one end-of-track is handled per call; a song that
    /// ends as soon as it starts is picked up on the following tick.
    pub fn tick(&mut self) {
        if let Some(SessionEvent::Stopped { path }) = self.session.poll() {
            info!("Finished {}, moving on", path.display());
            self.emit(PlayerEvent::StatusChanged(PlaybackStatus::Stopped));
            self.next();
        }
        self.emit_position();
    }

    fn emit_position(&self) {
        let (elapsed, duration) = self.session.position();
        self.emit(PlayerEvent::PositionChanged { elapsed, duration });
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> Option<usize> {
        self.navigator.current()
    }

    fn current(&self) -> Option<(usize, &Track)> {
        let index = self.navigator.current()?;
        self.tracks.get(index).map(|track| (index, track))
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current().map(|(_, track)| track)
    }

    pub fn status(&self) -> PlaybackStatus {
        self.session.status()
    }

    pub fn position(&self) -> (Duration, Duration) {
        self.session.position()
    }

    pub fn volume(&self) -> Volume {
        self.session.backend().volume()
    }
}

/// Slider position for `elapsed` of `duration`, or `None` while the length is unknown.
pub fn progress_percent(elapsed: Duration, duration: Duration) -> Option<u16> {
    if duration.is_zero() {
        return None;
    }
    let percent = (elapsed.as_secs_f64() / duration.as_secs_f64() * 100.0).round();
    Some(percent.clamp(0.0, 100.0) as u16)
}
