use super::track::probe_duration;
use super::{PlaybackBackend, Volume};
use crate::error::{LoadError, SeekError};
use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Plays through the default output device.
pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: Volume,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            volume: Volume::FULL,
        })
    }
}

impl PlaybackBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<Option<Duration>, LoadError> {
        // Stop current playback
        self.stop();

        let file = File::open(path).map_err(|e| LoadError::from_open(path.to_path_buf(), e))?;

        // Decode audio file - M4A/AAC via Symphonia, the rest via rodio defaults
        let source = Decoder::new(BufReader::new(file)).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let duration = source.total_duration().or_else(|| probe_duration(path));

        // New sink per track; a stopped sink can't be reused
        let sink = Sink::try_new(&self.stream_handle).map_err(|e| LoadError::Output(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.volume.as_gain());
        sink.append(source);

        debug!("Loaded {} ({:?})", path.display(), duration);
        self.sink = Some(sink);
        Ok(duration)
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), SeekError> {
        let sink = self.sink.as_ref().ok_or(SeekError::NothingLoaded)?;
        sink.try_seek(position).map_err(|e| {
            warn!("Seek to {:?} failed: {}", position, e);
            SeekError::Unsupported(e.to_string())
        })
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map(|sink| sink.get_pos()).unwrap_or_default()
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().map(|sink| sink.empty()).unwrap_or(true)
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume.as_gain());
        }
    }
}
