//! Post-encode quality metrics.
//!
//! PSNR and SSIM compare an original image with its stego version. They are
//! reported alongside the encode result and never cause an encode to fail.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::carrier::image::CHANNELS;
use crate::carrier::{AudioCarrier, ImageCarrier, VideoCarrier};
use crate::error::{Result, StegoError};

/// PSNR reported for identical inputs, and the upper cap for all others.
pub const MAX_PSNR_DB: f64 = 100.0;

/// Peak value of an 8-bit channel.
const PEAK: f64 = 255.0;

/// Edge length of the SSIM window.
pub const SSIM_WINDOW: usize = 7;

const SSIM_K1: f64 = 0.01;
const SSIM_K2: f64 = 0.03;

/// Coarse verdict on a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Grade {
    /// Grades a PSNR in dB: ≥40 excellent, ≥30 good, ≥20 fair.
    pub fn from_psnr(psnr: f64) -> Self {
        match psnr {
            p if p >= 40.0 => Grade::Excellent,
            p if p >= 30.0 => Grade::Good,
            p if p >= 20.0 => Grade::Fair,
            _ => Grade::Poor,
        }
    }

    /// Grades an SSIM: ≥0.95 excellent, ≥0.90 good, ≥0.80 fair.
    pub fn from_ssim(ssim: f64) -> Self {
        match ssim {
            s if s >= 0.95 => Grade::Excellent,
            s if s >= 0.90 => Grade::Good,
            s if s >= 0.80 => Grade::Fair,
            _ => Grade::Poor,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Fair => "fair",
            Grade::Poor => "poor",
        };
        f.write_str(name)
    }
}

/// Quality of a stego image relative to its original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub mse: f64,
    pub psnr: f64,
    pub ssim: f64,
    pub psnr_grade: Grade,
    pub ssim_grade: Grade,
}

impl QualityReport {
    pub fn measure(original: &ImageCarrier, stego: &ImageCarrier) -> Result<Self> {
        let mse = mse(original, stego)?;
        let psnr = psnr_from_mse(mse);
        let ssim = ssim(original, stego)?;
        Ok(Self {
            mse,
            psnr,
            ssim,
            psnr_grade: Grade::from_psnr(psnr),
            ssim_grade: Grade::from_ssim(ssim),
        })
    }
}

fn ensure_same_shape(original: &ImageCarrier, stego: &ImageCarrier) -> Result<()> {
    if (original.width(), original.height()) != (stego.width(), stego.height()) {
        return Err(StegoError::UnsupportedParameter(format!(
            "cannot compare {}x{} image with {}x{} image",
            original.width(),
            original.height(),
            stego.width(),
            stego.height()
        )));
    }
    Ok(())
}

fn squared_error(a: &[u8], b: &[u8]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum()
}

/// Mean squared error over every channel value.
pub fn mse(original: &ImageCarrier, stego: &ImageCarrier) -> Result<f64> {
    ensure_same_shape(original, stego)?;
    let count = original.pixels().len();
    if count == 0 {
        return Ok(0.0);
    }
    Ok(squared_error(original.pixels(), stego.pixels()) / count as f64)
}

/// PSNR in dB for a given MSE, capped at [`MAX_PSNR_DB`].
pub fn psnr_from_mse(mse: f64) -> f64 {
    if mse <= 0.0 {
        return MAX_PSNR_DB;
    }
    (20.0 * (PEAK / mse.sqrt()).log10()).min(MAX_PSNR_DB)
}

/// Peak signal-to-noise ratio in dB.
pub fn psnr(original: &ImageCarrier, stego: &ImageCarrier) -> Result<f64> {
    Ok(psnr_from_mse(mse(original, stego)?))
}

/// Structural similarity in `[0, 1]`, averaged over channels.
pub fn ssim(original: &ImageCarrier, stego: &ImageCarrier) -> Result<f64> {
    ensure_same_shape(original, stego)?;
    let width = original.width() as usize;
    let height = original.height() as usize;
    if width == 0 || height == 0 {
        return Ok(1.0);
    }

    let total: f64 = (0..CHANNELS)
        .into_par_iter()
        .map(|channel| {
            let x = plane(original.pixels(), channel);
            let y = plane(stego.pixels(), channel);
            channel_ssim(&x, &y, width, height)
        })
        .sum();

    Ok((total / CHANNELS as f64).clamp(0.0, 1.0))
}

fn plane(pixels: &[u8], channel: usize) -> Vec<f64> {
    pixels
        .iter()
        .skip(channel)
        .step_by(CHANNELS)
        .map(|&v| v as f64)
        .collect()
}

/// Running sums of x, y, x², y² and xy over a window.
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    x: f64,
    y: f64,
    xx: f64,
    yy: f64,
    xy: f64,
}

impl Moments {
    fn add(self, o: Self) -> Self {
        Self {
            x: self.x + o.x,
            y: self.y + o.y,
            xx: self.xx + o.xx,
            yy: self.yy + o.yy,
            xy: self.xy + o.xy,
        }
    }

    fn sub(self, o: Self) -> Self {
        Self {
            x: self.x - o.x,
            y: self.y - o.y,
            xx: self.xx - o.xx,
            yy: self.yy - o.yy,
            xy: self.xy - o.xy,
        }
    }

    fn ssim(&self, n: f64) -> f64 {
        let c1 = (SSIM_K1 * PEAK).powi(2);
        let c2 = (SSIM_K2 * PEAK).powi(2);
        let dof = if n > 1.0 { n - 1.0 } else { 1.0 };

        let mean_x = self.x / n;
        let mean_y = self.y / n;
        let var_x = (self.xx - self.x * mean_x) / dof;
        let var_y = (self.yy - self.y * mean_y) / dof;
        let cov = (self.xy - self.x * mean_y) / dof;

        ((2.0 * mean_x * mean_y + c1) * (2.0 * cov + c2))
            / ((mean_x * mean_x + mean_y * mean_y + c1) * (var_x + var_y + c2))
    }
}

fn channel_ssim(x: &[f64], y: &[f64], width: usize, height: usize) -> f64 {
    if width < SSIM_WINDOW || height < SSIM_WINDOW {
        let whole = x
            .iter()
            .zip(y)
            .fold(Moments::default(), |acc, (&a, &b)| {
                acc.add(Moments { x: a, y: b, xx: a * a, yy: b * b, xy: a * b })
            });
        return whole.ssim((width * height) as f64);
    }

    // Summed-area table, one row and column of zero padding.
    let stride = width + 1;
    let mut table = vec![Moments::default(); stride * (height + 1)];
    for row in 0..height {
        let mut line = Moments::default();
        for col in 0..width {
            let (a, b) = (x[row * width + col], y[row * width + col]);
            line = line.add(Moments { x: a, y: b, xx: a * a, yy: b * b, xy: a * b });
            table[(row + 1) * stride + col + 1] = table[row * stride + col + 1].add(line);
        }
    }

    let n = (SSIM_WINDOW * SSIM_WINDOW) as f64;
    let mut sum = 0.0;
    let mut windows = 0usize;
    for top in 0..=height - SSIM_WINDOW {
        for left in 0..=width - SSIM_WINDOW {
            let (bottom, right) = (top + SSIM_WINDOW, left + SSIM_WINDOW);
            let window = table[bottom * stride + right]
                .sub(table[top * stride + right])
                .sub(table[bottom * stride + left])
                .add(table[top * stride + left]);
            sum += window.ssim(n);
            windows += 1;
        }
    }
    sum / windows as f64
}

/// Signal-to-noise ratio in dB between two audio sample buffers.
///
/// Identical buffers give [`MAX_PSNR_DB`]; a silent original gives 0.
pub fn audio_snr(original: &AudioCarrier, stego: &AudioCarrier) -> Result<f64> {
    if original.sample_count() != stego.sample_count() || original.channels() != stego.channels() {
        return Err(StegoError::UnsupportedParameter(format!(
            "cannot compare {} samples ({} ch) with {} samples ({} ch)",
            original.sample_count(),
            original.channels(),
            stego.sample_count(),
            stego.channels()
        )));
    }

    let (signal, noise) = original
        .samples()
        .iter()
        .zip(stego.samples())
        .fold((0.0, 0.0), |(signal, noise), (&a, &b)| {
            let d = a as f64 - b as f64;
            (signal + (a as f64).powi(2), noise + d * d)
        });

    if noise == 0.0 {
        return Ok(MAX_PSNR_DB);
    }
    if signal == 0.0 {
        return Ok(0.0);
    }
    Ok((10.0 * (signal / noise).log10()).min(MAX_PSNR_DB))
}

/// PSNR over the first `max_frames` frames of two videos, from the mean MSE.
pub fn video_psnr(original: &VideoCarrier, stego: &VideoCarrier, max_frames: usize) -> Result<f64> {
    if max_frames == 0 {
        return Err(StegoError::UnsupportedParameter(
            "max_frames must be at least 1".to_string(),
        ));
    }
    if original.frame_count() != stego.frame_count()
        || (original.width(), original.height()) != (stego.width(), stego.height())
    {
        return Err(StegoError::UnsupportedParameter(format!(
            "cannot compare {} frames of {}x{} with {} frames of {}x{}",
            original.frame_count(),
            original.width(),
            original.height(),
            stego.frame_count(),
            stego.width(),
            stego.height()
        )));
    }

    let frames = original.frame_count().min(max_frames);
    let per_frame = original.frames()[0].as_raw().len().max(1) as f64;
    let total: f64 = original
        .frames()
        .par_iter()
        .zip(stego.frames().par_iter())
        .take(frames)
        .map(|(a, b)| squared_error(a.as_raw(), b.as_raw()) / per_frame)
        .sum();

    Ok(psnr_from_mse(total / frames as f64))
}
