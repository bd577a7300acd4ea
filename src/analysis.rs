//! Carrier suitability analysis.
//!
//! Texture statistics of an image's luma channel. Busy, noisy images mask
//! embedding changes better than flat ones; [`Suitability`] turns the
//! statistics into a grade.
//!
//! ```text
//! entropy      Shannon entropy of the 256-bin luma histogram, in bits
//! variance     population variance of luma
//! edge_density share of pixels whose Sobel gradient exceeds EDGE_THRESHOLD
//! noise_level  standard deviation of the 4-neighbour Laplacian
//! uniformity   sum of squared histogram probabilities
//! smoothness   1 - 1 / (1 + variance)
//! ```

use std::fmt;

use log::warn;
use rayon::prelude::*;
use serde::Serialize;

use crate::carrier::image::CHANNELS;
use crate::carrier::ImageCarrier;
use crate::codec::Codec;
use crate::error::{Result, StegoError};
use crate::lsb::LsbImage;

/// Images narrower or shorter than this are rejected.
pub const MIN_DIMENSION: u32 = 10;

/// Below this many pixels the analysis runs but logs a warning.
pub const SMALL_IMAGE_PIXELS: u64 = 10_000;

/// Sobel gradient magnitude above which a pixel counts as an edge.
pub const EDGE_THRESHOLD: f64 = 100.0;

/// LSB widths listed in [`ImageAnalysis::lsb_capacity`].
pub const REPORTED_WIDTHS: [u8; 3] = [1, 2, 4];

/// How well an image hides embedded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Suitability {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl Suitability {
    /// Grades the statistics on a 0..=7 point scale.
    pub fn assess(entropy: f64, variance: f64, edge_density: f64, noise_level: f64) -> Self {
        let mut score = 0;
        score += tier(entropy, 6.5, 5.5);
        score += tier(variance, 1000.0, 500.0);
        score += tier(edge_density, 0.1, 0.05);
        if noise_level > 10.0 {
            score += 1;
        }

        match score {
            6.. => Suitability::Excellent,
            4..=5 => Suitability::Good,
            2..=3 => Suitability::Moderate,
            _ => Suitability::Poor,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Suitability::Excellent => "high texture, complex image ideal for hiding data",
            Suitability::Good => "sufficient complexity for hiding data",
            Suitability::Moderate => "low texture, embedded data may be more detectable",
            Suitability::Poor => "very smooth image, embedding will be more visible",
        }
    }
}

fn tier(value: f64, high: f64, low: f64) -> u32 {
    if value > high {
        2
    } else if value > low {
        1
    } else {
        0
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suitability::Excellent => "Excellent",
            Suitability::Good => "Good",
            Suitability::Moderate => "Moderate",
            Suitability::Poor => "Poor",
        };
        write!(f, "{}", name)
    }
}

/// Raw LSB capacity at one width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LsbCapacity {
    pub bits_per_channel: u8,
    pub bytes: usize,
}

/// Statistics of one image carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAnalysis {
    pub width: u32,
    pub height: u32,
    pub entropy: f64,
    pub variance: f64,
    pub edge_density: f64,
    /// `variance * edge_density`
    pub texture_score: f64,
    pub noise_level: f64,
    pub uniformity: f64,
    pub smoothness: f64,
    pub lsb_capacity: Vec<LsbCapacity>,
    pub suitability: Suitability,
}

/// Analyzes an image carrier.
///
/// Fails with `UnsupportedParameter` if either side is below [`MIN_DIMENSION`].
pub fn analyze(image: &ImageCarrier) -> Result<ImageAnalysis> {
    let (width, height) = (image.width(), image.height());
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(StegoError::UnsupportedParameter(format!(
            "image too small to analyze: {}x{}, minimum {}x{}",
            width, height, MIN_DIMENSION, MIN_DIMENSION
        )));
    }
    if (width as u64) * (height as u64) < SMALL_IMAGE_PIXELS {
        warn!("small image ({}x{}): limited capacity for hiding data", width, height);
    }

    let luma = luma(image);
    let (w, h) = (width as usize, height as usize);

    let histogram = histogram(&luma);
    let total = luma.len() as f64;
    let probabilities: Vec<f64> = histogram.iter().map(|&count| count as f64 / total).collect();
    let entropy = -probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.log2())
        .sum::<f64>();
    let uniformity = probabilities.iter().map(|p| p * p).sum::<f64>();

    let mean = luma.iter().map(|&v| v as f64).sum::<f64>() / total;
    let variance = luma.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / total;
    let smoothness = 1.0 - 1.0 / (1.0 + variance);

    let edge_density = edge_pixels(&luma, w, h) as f64 / total;
    let noise_level = laplacian_deviation(&luma, w, h);

    let lsb_capacity = REPORTED_WIDTHS
        .iter()
        .map(|&bits| {
            Ok(LsbCapacity {
                bits_per_channel: bits,
                bytes: LsbImage::new(bits)?.capacity_bits(image) / 8,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ImageAnalysis {
        width,
        height,
        entropy,
        variance,
        edge_density,
        texture_score: variance * edge_density,
        noise_level,
        uniformity,
        smoothness,
        lsb_capacity,
        suitability: Suitability::assess(entropy, variance, edge_density, noise_level),
    })
}

/// ITU-R BT.601 luma, rounded to 8 bits.
fn luma(image: &ImageCarrier) -> Vec<u8> {
    image
        .pixels()
        .chunks_exact(CHANNELS)
        .map(|px| (0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64).round() as u8)
        .collect()
}

fn histogram(luma: &[u8]) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for &value in luma {
        counts[value as usize] += 1;
    }
    counts
}

/// Interior pixels whose Sobel gradient magnitude exceeds [`EDGE_THRESHOLD`].
fn edge_pixels(luma: &[u8], width: usize, height: usize) -> usize {
    let at = |x: usize, y: usize| luma[y * width + x] as f64;
    (1..height - 1)
        .into_par_iter()
        .map(|y| {
            (1..width - 1)
                .filter(|&x| {
                    let gx = (at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1))
                        - (at(x - 1, y - 1) + 2.0 * at(x - 1, y) + at(x - 1, y + 1));
                    let gy = (at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1))
                        - (at(x - 1, y - 1) + 2.0 * at(x, y - 1) + at(x + 1, y - 1));
                    gx.hypot(gy) > EDGE_THRESHOLD
                })
                .count()
        })
        .sum()
}

/// Standard deviation of the 4-neighbour Laplacian over interior pixels.
fn laplacian_deviation(luma: &[u8], width: usize, height: usize) -> f64 {
    let at = |x: usize, y: usize| luma[y * width + x] as f64;
    let (sum, sum_sq) = (1..height - 1)
        .into_par_iter()
        .map(|y| {
            (1..width - 1).fold((0.0, 0.0), |(sum, sum_sq), x| {
                let value = at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4.0 * at(x, y);
                (sum + value, sum_sq + value * value)
            })
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    let count = ((width - 2) * (height - 2)) as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0).sqrt()
}
