//! In-memory carrier buffers.
//!
//! Supports:
//! - RGB images (PNG, BMP on disk)
//! - PCM audio (8/16/24-bit WAV on disk)
//! - Video as an ordered sequence of RGB frames (numbered PNG frames on disk)
//!
//! Codecs only ever see the decoded buffers; the file helpers here are
//! conveniences for the CLI and tests.

pub mod audio;
pub mod image;
pub mod video;

use std::fmt;
use std::path::Path;

use thiserror::Error;

pub use self::audio::AudioCarrier;
pub use self::image::ImageCarrier;
pub use self::video::VideoCarrier;

/// Errors that can occur while loading or saving carriers.
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Save error: {0}")]
    Save(String),

    #[error("Unsupported carrier format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Carrier type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    Image,
    Audio,
    Video,
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CarrierKind::Image => "image",
            CarrierKind::Audio => "audio",
            CarrierKind::Video => "video",
        };
        f.write_str(name)
    }
}

/// A carrier buffer of any supported type.
#[derive(Debug, Clone, PartialEq)]
pub enum Carrier {
    Image(ImageCarrier),
    Audio(AudioCarrier),
    Video(VideoCarrier),
}

impl Carrier {
    pub fn kind(&self) -> CarrierKind {
        match self {
            Carrier::Image(_) => CarrierKind::Image,
            Carrier::Audio(_) => CarrierKind::Audio,
            Carrier::Video(_) => CarrierKind::Video,
        }
    }

    /// Loads a carrier, choosing the type from the path.
    ///
    /// Directories are read as PNG frame sequences, `.wav` files as audio and
    /// everything else as an image.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CarrierError> {
        let path = path.as_ref();
        if path.is_dir() {
            return Ok(Carrier::Video(VideoCarrier::from_frame_dir(path)?));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "wav" => Ok(Carrier::Audio(AudioCarrier::from_file(path)?)),
            "png" | "bmp" => Ok(Carrier::Image(ImageCarrier::from_file(path)?)),
            other => Err(CarrierError::UnsupportedFormat(format!(
                "'{}' (expected .png, .bmp, .wav or a frame directory)",
                other
            ))),
        }
    }

    /// Writes the carrier in a lossless format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CarrierError> {
        match self {
            Carrier::Image(image) => image.save(path),
            Carrier::Audio(audio) => audio.save(path),
            Carrier::Video(video) => video.save_frame_dir(path),
        }
    }

    /// Short human-readable description of the carrier's shape.
    pub fn describe(&self) -> String {
        match self {
            Carrier::Image(image) => format!("image {}x{}", image.width(), image.height()),
            Carrier::Audio(audio) => format!(
                "audio {} samples, {} ch, {}-bit, {} Hz",
                audio.sample_count(),
                audio.channels(),
                audio.bits_per_sample(),
                audio.sample_rate()
            ),
            Carrier::Video(video) => format!(
                "video {} frames {}x{} @ {:.2} fps",
                video.frame_count(),
                video.width(),
                video.height(),
                video.frame_rate()
            ),
        }
    }
}

impl From<ImageCarrier> for Carrier {
    fn from(image: ImageCarrier) -> Self {
        Carrier::Image(image)
    }
}

impl From<AudioCarrier> for Carrier {
    fn from(audio: AudioCarrier) -> Self {
        Carrier::Audio(audio)
    }
}

impl From<VideoCarrier> for Carrier {
    fn from(video: VideoCarrier) -> Self {
        Carrier::Video(video)
    }
}
