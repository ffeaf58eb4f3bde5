// The seam between the player and whatever actually makes sound

use super::track::probe_duration;
use super::Volume;
use crate::error::{LoadError, SeekError};
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

/// Decode + output + transport for one file at a time.
pub trait PlaybackBackend {
    /// Open `path` paused at the start. Returns the duration when it is known.
    fn load(&mut self, path: &Path) -> Result<Option<Duration>, LoadError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Drop whatever is loaded.
    fn stop(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), SeekError>;
    fn position(&self) -> Duration;
    /// True once the loaded source has played out.
    fn is_finished(&self) -> bool;
    fn volume(&self) -> Volume;
    fn set_volume(&mut self, volume: Volume);
}

impl<B: PlaybackBackend + ?Sized> PlaybackBackend for Box<B> {
    fn load(&mut self, path: &Path) -> Result<Option<Duration>, LoadError> {
        (**self).load(path)
    }
    fn play(&mut self) {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn stop(&mut self) {
        (**self).stop()
    }
    fn seek(&mut self, position: Duration) -> Result<(), SeekError> {
        (**self).seek(position)
    }
    fn position(&self) -> Duration {
        (**self).position()
    }
    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
    fn volume(&self) -> Volume {
        (**self).volume()
    }
    fn set_volume(&mut self, volume: Volume) {
        (**self).set_volume(volume)
    }
}

/// Keeps time like a real player but produces no sound.
/// Used when no output device can be opened.
#[derive(Debug, Default)]
pub struct SilentBackend {
    loaded: bool,
    duration: Option<Duration>,
    offset: Duration,
    started: Option<Instant>,
    volume: Volume,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn elapsed(&self) -> Duration {
        let running = self.started.map(|t| t.elapsed()).unwrap_or_default();
        let elapsed = self.offset + running;
        match self.duration {
            Some(total) => elapsed.min(total),
            None => elapsed,
        }
    }
}

impl PlaybackBackend for SilentBackend {
    fn load(&mut self, path: &Path) -> Result<Option<Duration>, LoadError> {
        File::open(path).map_err(|e| LoadError::from_open(path.to_path_buf(), e))?;

        self.loaded = true;
        self.duration = probe_duration(path);
        self.offset = Duration::ZERO;
        self.started = None;
        Ok(self.duration)
    }

    fn play(&mut self) {
        if self.loaded && self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.offset += started.elapsed();
        }
    }

    fn stop(&mut self) {
        *self = Self {
            volume: self.volume,
            ..Self::default()
        };
    }

    fn seek(&mut self, position: Duration) -> Result<(), SeekError> {
        if !self.loaded {
            return Err(SeekError::NothingLoaded);
        }
        self.offset = position;
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        self.elapsed()
    }

    fn is_finished(&self) -> bool {
        match self.duration {
            Some(total) => self.loaded && self.elapsed() >= total,
            None => false,
        }
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }
}
