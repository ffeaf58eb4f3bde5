use super::PlaybackBackend;
use crate::error::LoadError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing loaded.
    Empty,
    Paused,
    Playing,
    /// The loaded track played to its end.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Stopped { path: PathBuf },
}

/// The single live playback handle plus the state machine around it.
///
/// `load` leaves the session `Paused` at zero. `play`/`pause` move between
/// `Paused` and `Playing` and do nothing when already there. Natural end of
/// the source while `Playing` moves to `Stopped` and queues a
/// [`SessionEvent::Stopped`], picked up through [`PlaybackSession::poll`].
pub struct PlaybackSession<B> {
    backend: B,
    target: Option<PathBuf>,
    status: PlaybackStatus,
    duration: Duration,
    events: VecDeque<SessionEvent>,
}

impl<B: PlaybackBackend> PlaybackSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            target: None,
            status: PlaybackStatus::Empty,
            duration: Duration::ZERO,
            events: VecDeque::new(),
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match self.backend.load(path) {
            Ok(duration) => {
                self.target = Some(path.to_path_buf());
                self.status = PlaybackStatus::Paused;
                self.duration = duration.unwrap_or_default();
                info!("Session bound to {}", path.display());
                Ok(())
            }
            Err(e) => {
                self.unload();
                Err(e)
            }
        }
    }

    pub fn unload(&mut self) {
        self.backend.stop();
        self.target = None;
        self.status = PlaybackStatus::Empty;
        self.duration = Duration::ZERO;
        self.events.clear();
    }

    pub fn play(&mut self) {
        match self.status {
            PlaybackStatus::Paused => {
                self.backend.play();
                self.status = PlaybackStatus::Playing;
            }
            PlaybackStatus::Stopped => {
                // A played-out source has nothing left; start it over.
                let Some(path) = self.target.clone() else {
                    return;
                };
                match self.load(&path) {
                    Ok(()) => {
                        self.backend.play();
                        self.status = PlaybackStatus::Playing;
                    }
                    Err(e) => warn!("Could not restart {}: {}", path.display(), e),
                }
            }
            PlaybackStatus::Playing | PlaybackStatus::Empty => {}
        }
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.backend.pause();
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn toggle(&mut self) {
        match self.status {
            PlaybackStatus::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Jump to `fraction` of the track. `None` when nothing is loaded or the
    /// length is unknown.
    pub fn seek(&mut self, fraction: f64) -> Option<Duration> {
        if self.target.is_none() || self.duration.is_zero() {
            return None;
        }
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let position = self.duration.mul_f64(fraction);

        match self.backend.seek(position) {
            Ok(()) => {
                debug!("Seeked to {:?} of {:?}", position, self.duration);
                Some(position)
            }
            Err(e) => {
                debug!("Seek ignored: {}", e);
                None
            }
        }
    }

    /// `(elapsed, duration)`; duration is zero when unknown.
    pub fn position(&self) -> (Duration, Duration) {
        if self.target.is_none() {
            return (Duration::ZERO, Duration::ZERO);
        }
        let elapsed = self.backend.position();
        if self.duration.is_zero() {
            (elapsed, self.duration)
        } else {
            (elapsed.min(self.duration), self.duration)
        }
    }

    /// Check for end of track and hand out the next queued event.
    pub fn poll(&mut self) -> Option<SessionEvent> {
        if self.status == PlaybackStatus::Playing && self.backend.is_finished() {
            self.status = PlaybackStatus::Stopped;
            if let Some(path) = self.target.clone() {
                debug!("Reached end of {}", path.display());
                self.events.push_back(SessionEvent::Stopped { path });
            }
        }
        self.events.pop_front()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Volume;
    use crate::error::SeekError;

    /// Backend whose clock and end-of-track are set by the test.
    #[derive(Default)]
    struct Scripted {
        duration: Option<Duration>,
        position: Duration,
        playing: bool,
        finished: bool,
        loads: usize,
        volume: Volume,
    }

    impl PlaybackBackend for Scripted {
        fn load(&mut self, path: &Path) -> Result<Option<Duration>, LoadError> {
            if path.to_string_lossy().contains("broken") {
                return Err(LoadError::Decode {
                    path: path.to_path_buf(),
                    reason: "bad header".into(),
                });
            }
            self.loads += 1;
            self.position = Duration::ZERO;
            self.finished = false;
            self.playing = false;
            Ok(self.duration)
        }
        fn play(&mut self) {
            self.playing = true;
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn stop(&mut self) {
            self.playing = false;
        }
        fn seek(&mut self, position: Duration) -> Result<(), SeekError> {
            self.position = position;
            Ok(())
        }
        fn position(&self) -> Duration {
            self.position
        }
        fn is_finished(&self) -> bool {
            self.finished
        }
        fn volume(&self) -> Volume {
            self.volume
        }
        fn set_volume(&mut self, volume: Volume) {
            self.volume = volume;
        }
    }

    fn session_with(duration: Option<Duration>) -> PlaybackSession<Scripted> {
        PlaybackSession::new(Scripted {
            duration,
            ..Default::default()
        })
    }

    #[test]
    fn load_leaves_session_paused_at_zero() {
        let mut session = session_with(Some(Duration::from_secs(200)));
        assert_eq!(session.status(), PlaybackStatus::Empty);

        session.load(Path::new("/music/a.mp3")).unwrap();
        assert_eq!(session.status(), PlaybackStatus::Paused);
        assert_eq!(session.position(), (Duration::ZERO, Duration::from_secs(200)));
    }

    #[test]
    fn play_and_pause_are_idempotent() {
        let mut session = session_with(None);
        session.play();
        assert_eq!(session.status(), PlaybackStatus::Empty);

        session.load(Path::new("/music/a.mp3")).unwrap();
        session.play();
        session.play();
        assert_eq!(session.status(), PlaybackStatus::Playing);
        assert!(session.backend().playing);

        session.pause();
        session.pause();
        assert_eq!(session.status(), PlaybackStatus::Paused);

        session.toggle();
        assert_eq!(session.status(), PlaybackStatus::Playing);
        session.toggle();
        assert_eq!(session.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn seek_maps_fraction_onto_duration() {
        let mut session = session_with(Some(Duration::from_secs(200)));
        session.load(Path::new("/music/a.mp3")).unwrap();

        assert_eq!(session.seek(0.5), Some(Duration::from_secs(100)));
        assert_eq!(session.position().0, Duration::from_secs(100));
        assert_eq!(session.seek(3.0), Some(Duration::from_secs(200)));
        assert_eq!(session.seek(-1.0), Some(Duration::ZERO));
    }

    #[test]
    fn seek_without_duration_is_a_no_op() {
        let mut session = session_with(None);
        assert_eq!(session.seek(0.5), None);

        session.load(Path::new("/music/a.mp3")).unwrap();
        assert_eq!(session.seek(0.5), None);
        assert_eq!(session.position(), (Duration::ZERO, Duration::ZERO));
    }

    #[test]
    fn end_of_track_emits_stopped_once() {
        let mut session = session_with(Some(Duration::from_secs(10)));
        session.load(Path::new("/music/a.mp3")).unwrap();
        session.play();
        assert_eq!(session.poll(), None);

        session.backend_mut().finished = true;
        assert_eq!(
            session.poll(),
            Some(SessionEvent::Stopped {
                path: PathBuf::from("/music/a.mp3")
            })
        );
        assert_eq!(session.status(), PlaybackStatus::Stopped);
        assert_eq!(session.poll(), None);
    }

    #[test]
    fn paused_session_does_not_report_end() {
        let mut session = session_with(Some(Duration::from_secs(10)));
        session.load(Path::new("/music/a.mp3")).unwrap();
        session.backend_mut().finished = true;
        assert_eq!(session.poll(), None);
        assert_eq!(session.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn play_after_stop_restarts_the_track() {
        let mut session = session_with(Some(Duration::from_secs(10)));
        session.load(Path::new("/music/a.mp3")).unwrap();
        session.play();
        session.backend_mut().finished = true;
        session.poll();

        session.play();
        assert_eq!(session.status(), PlaybackStatus::Playing);
        assert_eq!(session.backend().loads, 2);
    }

    #[test]
    fn failed_load_empties_the_session() {
        let mut session = session_with(Some(Duration::from_secs(10)));
        session.load(Path::new("/music/a.mp3")).unwrap();

        let err = session.load(Path::new("/music/broken.mp3")).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert_eq!(session.status(), PlaybackStatus::Empty);
        assert_eq!(session.target(), None);
    }
}
