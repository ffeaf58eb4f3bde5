use super::AudioFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A registered song. The path is the identity; everything else is read from
/// the file when asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub file_path: PathBuf,
    pub format: AudioFormat,
}

/// One row of the song table, derived from the file at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub name: String,
    pub duration: Option<Duration>,
    pub size_bytes: Option<u64>,
}

impl Track {
    pub fn new(file_path: PathBuf) -> Self {
        let format = AudioFormat::from_path(&file_path);
        Self { file_path, format }
    }

    /// File name of the track, falling back to the whole path when there is none.
    pub fn display_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }

    pub fn file_size(&self) -> Option<u64> {
        fs::metadata(&self.file_path).ok().map(|meta| meta.len())
    }

    pub fn duration(&self) -> Option<Duration> {
        probe_duration(&self.file_path)
    }

    pub fn info(&self) -> TrackInfo {
        TrackInfo {
            name: self.display_name(),
            duration: self.duration(),
            size_bytes: self.file_size(),
        }
    }
}

impl TrackInfo {
    pub fn length_label(&self) -> String {
        match self.duration {
            Some(d) => format!("{} sec", d.as_secs_f64().round() as u64),
            None => "?".to_string(),
        }
    }

    pub fn size_label(&self) -> String {
        match self.size_bytes {
            Some(bytes) => format!("{} bytes", bytes),
            None => "?".to_string(),
        }
    }
}

/// Read the total play time from the container headers.
#[cfg(feature = "probe")]
pub fn probe_duration(path: &Path) -> Option<Duration> {
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = fs::File::open(path).ok()?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| tracing::debug!("Probe failed for {}: {}", path.display(), e))
        .ok()?;

    let track = probed.format.default_track()?;
    let params = &track.codec_params;
    let (frames, time_base) = (params.n_frames?, params.time_base?);
    let time = time_base.calc_time(frames);

    Some(Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac))
}

#[cfg(not(feature = "probe"))]
pub fn probe_duration(_path: &Path) -> Option<Duration> {
    None
}
