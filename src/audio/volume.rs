// Volume setting + the little text file that remembers it between runs

use crate::error::VolumeFileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Output volume in percent. Always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;
    pub const FULL: Volume = Volume(Self::MAX);

    pub fn new(percent: u8) -> Option<Self> {
        (percent <= Self::MAX).then_some(Volume(percent))
    }

    /// Saturate any integer into range.
    pub fn clamped(percent: i64) -> Self {
        Volume(percent.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Linear gain for the output sink.
    pub fn as_gain(self) -> f32 {
        self.0 as f32 / Self::MAX as f32
    }

    pub fn step(self, delta: i64) -> Self {
        Self::clamped(self.0 as i64 + delta)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume::FULL
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Volume {
    type Err = VolumeFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.trim().parse()?;
        u8::try_from(raw)
            .ok()
            .and_then(Volume::new)
            .ok_or(VolumeFileError::OutOfRange(raw))
    }
}

impl TryFrom<u8> for Volume {
    type Error = VolumeFileError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Volume::new(value).ok_or(VolumeFileError::OutOfRange(value as i64))
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

/// Where the volume slider position is kept.
#[derive(Debug, Clone)]
pub struct VolumeFile {
    path: PathBuf,
}

impl VolumeFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Volume, VolumeFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(VolumeFileError::Missing),
            Err(e) => return Err(e.into()),
        };
        content.parse()
    }

    /// Stored volume, or `default` when the file is missing or unusable.
    pub fn load_or(&self, default: Volume) -> Volume {
        match self.read() {
            Ok(volume) => volume,
            Err(VolumeFileError::Missing) => default,
            Err(e) => {
                debug!("Ignoring volume file {}: {}", self.path.display(), e);
                default
            }
        }
    }

    pub fn save(&self, volume: Volume) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, volume.to_string())
    }

    /// Best-effort save; a failed write never reaches the user.
    pub fn store(&self, volume: Volume) {
        if let Err(e) = self.save(volume) {
            warn!("Failed to save volume to {}: {}", self.path.display(), e);
        }
    }
}
