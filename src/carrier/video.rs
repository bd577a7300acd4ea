//! Video carriers as decoded frame sequences.
//!
//! Container demuxing and codecs stay outside the engine. On disk a video is a
//! directory of numbered lossless PNG frames (`frame_000000.png`, ...) plus a
//! small `video.json` descriptor with the frame rate and codec name.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::CarrierError;

/// Descriptor file written next to the frames.
const DESCRIPTOR_FILE: &str = "video.json";

/// Default frame rate when a frame directory has no descriptor.
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// Codec descriptor for frames written by this crate.
pub const LOSSLESS_CODEC: &str = "png";

#[derive(Debug, Serialize, Deserialize)]
struct Descriptor {
    frame_rate: f64,
    codec: String,
}

/// An ordered sequence of equally sized RGB frames.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCarrier {
    frames: Vec<RgbImage>,
    frame_rate: f64,
    codec: String,
}

impl VideoCarrier {
    /// Creates a video from frames. All frames must share the first frame's size.
    pub fn new(frames: Vec<RgbImage>, frame_rate: f64, codec: impl Into<String>) -> Result<Self, CarrierError> {
        let first = frames
            .first()
            .ok_or_else(|| CarrierError::Load("video has no frames".to_string()))?;
        let (width, height) = first.dimensions();

        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.dimensions() != (width, height))
        {
            return Err(CarrierError::Load(format!(
                "frame {} is {}x{}, expected {}x{}",
                index,
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }

        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(CarrierError::Load(format!("invalid frame rate {}", frame_rate)));
        }

        Ok(Self {
            frames,
            frame_rate,
            codec: codec.into(),
        })
    }

    /// Loads every `.png` file in a directory, ordered by file name.
    pub fn from_frame_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CarrierError> {
        let dir = dir.as_ref();

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("png"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let frames = paths
            .iter()
            .map(|p| {
                image::open(p)
                    .map(|img| img.to_rgb8())
                    .map_err(|e| CarrierError::Load(format!("{}: {}", p.display(), e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        let (frame_rate, codec) = if descriptor_path.exists() {
            let text = fs::read_to_string(&descriptor_path)?;
            let descriptor: Descriptor =
                serde_json::from_str(&text).map_err(|e| CarrierError::Load(e.to_string()))?;
            (descriptor.frame_rate, descriptor.codec)
        } else {
            (DEFAULT_FRAME_RATE, LOSSLESS_CODEC.to_string())
        };

        Self::new(frames, frame_rate, codec)
    }

    /// Writes frames as numbered PNG files plus the descriptor.
    pub fn save_frame_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(), CarrierError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for (index, frame) in self.frames.iter().enumerate() {
            let path = dir.join(format!("frame_{:06}.png", index));
            frame
                .save(&path)
                .map_err(|e| CarrierError::Save(format!("{}: {}", path.display(), e)))?;
        }

        let descriptor = Descriptor {
            frame_rate: self.frame_rate,
            codec: LOSSLESS_CODEC.to_string(),
        };
        let text =
            serde_json::to_string_pretty(&descriptor).map_err(|e| CarrierError::Save(e.to_string()))?;
        fs::write(dir.join(DESCRIPTOR_FILE), text)?;
        Ok(())
    }

    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [RgbImage] {
        &mut self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn width(&self) -> u32 {
        self.frames[0].width()
    }

    pub fn height(&self) -> u32 {
        self.frames[0].height()
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames.len() as f64 / self.frame_rate
    }
}
