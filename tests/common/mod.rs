#![allow(dead_code)]

use exl_player::audio::PlaybackBackend;
use exl_player::error::{LoadError, SeekError};
use exl_player::Volume;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// What the test can see and steer from outside the controller.
#[derive(Default)]
pub struct Script {
    pub durations: HashMap<PathBuf, Duration>,
    pub broken: Vec<PathBuf>,
    pub loaded: Option<PathBuf>,
    pub load_log: Vec<PathBuf>,
    pub playing: bool,
    pub position: Duration,
    pub finished: bool,
    /// Every load reports the track as already over.
    pub finish_on_load: bool,
    pub volume: Volume,
}

#[derive(Clone, Default)]
pub struct ScriptedBackend {
    pub script: Rc<RefCell<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(volume: u8) -> Self {
        let backend = Self::default();
        backend.script.borrow_mut().volume = Volume::new(volume).unwrap();
        backend
    }

    pub fn set_duration(&self, path: &str, secs: u64) {
        self.script
            .borrow_mut()
            .durations
            .insert(PathBuf::from(path), Duration::from_secs(secs));
    }

    pub fn break_file(&self, path: &str) {
        self.script.borrow_mut().broken.push(PathBuf::from(path));
    }

    pub fn finish_every_load(&self) {
        self.script.borrow_mut().finish_on_load = true;
    }

    pub fn load_count(&self) -> usize {
        self.script.borrow().load_log.len()
    }

    pub fn finish_track(&self) {
        self.script.borrow_mut().finished = true;
    }

    pub fn loaded(&self) -> Option<PathBuf> {
        self.script.borrow().loaded.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.script.borrow().playing
    }
}

impl PlaybackBackend for ScriptedBackend {
    fn load(&mut self, path: &Path) -> Result<Option<Duration>, LoadError> {
        let mut s = self.script.borrow_mut();
        if s.broken.iter().any(|p| p == path) {
            s.loaded = None;
            return Err(LoadError::Decode {
                path: path.to_path_buf(),
                reason: "unsupported".into(),
            });
        }
        s.loaded = Some(path.to_path_buf());
        s.load_log.push(path.to_path_buf());
        s.playing = false;
        s.finished = s.finish_on_load;
        s.position = Duration::ZERO;
        Ok(s.durations.get(path).copied())
    }

    fn play(&mut self) {
        self.script.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.script.borrow_mut().playing = false;
    }

    fn stop(&mut self) {
        let mut s = self.script.borrow_mut();
        s.playing = false;
        s.loaded = None;
    }

    fn seek(&mut self, position: Duration) -> Result<(), SeekError> {
        let mut s = self.script.borrow_mut();
        if s.loaded.is_none() {
            return Err(SeekError::NothingLoaded);
        }
        s.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.script.borrow().position
    }

    fn is_finished(&self) -> bool {
        self.script.borrow().finished
    }

    fn volume(&self) -> Volume {
        self.script.borrow().volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.script.borrow_mut().volume = volume;
    }
}
