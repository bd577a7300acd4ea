//! Haar wavelet embedding.
//!
//! A one-level orthonormal Haar transform splits every 2×2 block
//! `[a b; c d]` into
//!
//! ```text
//! LL = (a + b + c + d) / 2    LH = (a + b - c - d) / 2
//! HL = (a - b + c - d) / 2    HH = (a - b - c + d) / 2
//! ```
//!
//! The horizontal detail `LH` carries one bit per block per channel.

use crate::carrier::image::CHANNELS;
use crate::carrier::ImageCarrier;
use crate::codec::Codec;
use crate::error::Result;

use super::{embed_sign_bits, extract_sign_bits, whole_blocks, BlockTransform};

/// Haar block edge length.
pub const BLOCK_SIZE: usize = 2;

/// Images narrower or shorter than this carry nothing.
pub const MIN_DIMENSION: usize = 32;

/// Coefficient magnitude per unit of `strength`.
pub const STRENGTH_SCALE: f64 = 100.0;

/// Haar blocks per channel, zero below the minimum size.
pub fn block_count(width: usize, height: usize) -> usize {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return 0;
    }
    whole_blocks(width, height, BLOCK_SIZE)
}

/// Subbands of one 2×2 block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaarBlock {
    pub ll: f64,
    pub lh: f64,
    pub hl: f64,
    pub hh: f64,
}

impl HaarBlock {
    /// Forward transform of `[a, b, c, d]` (row-major).
    pub fn forward(block: &[f64]) -> Self {
        let (a, b, c, d) = (block[0], block[1], block[2], block[3]);
        Self {
            ll: (a + b + c + d) / 2.0,
            lh: (a + b - c - d) / 2.0,
            hl: (a - b + c - d) / 2.0,
            hh: (a - b - c + d) / 2.0,
        }
    }

    /// Inverse transform back to `[a, b, c, d]`.
    pub fn inverse(&self) -> [f64; 4] {
        let Self { ll, lh, hl, hh } = *self;
        [
            (ll + lh + hl + hh) / 2.0,
            (ll + lh - hl - hh) / 2.0,
            (ll - lh + hl - hh) / 2.0,
            (ll - lh - hl + hh) / 2.0,
        ]
    }
}

/// Haar sign codec for images.
#[derive(Debug, Clone, Copy)]
pub struct DwtCodec {
    strength: f64,
}

impl DwtCodec {
    pub fn new(strength: f64) -> Self {
        Self { strength }
    }

    /// Initial `LH` magnitude.
    pub fn magnitude(&self) -> f64 {
        self.strength * STRENGTH_SCALE
    }
}

impl BlockTransform for DwtCodec {
    fn size(&self) -> usize {
        BLOCK_SIZE
    }

    fn coefficient(&self, block: &[f64]) -> f64 {
        HaarBlock::forward(block).lh
    }

    fn with_coefficient(&self, block: &[f64], value: f64) -> Vec<f64> {
        let mut haar = HaarBlock::forward(block);
        haar.lh = value;
        haar.inverse().to_vec()
    }
}

impl Codec<ImageCarrier> for DwtCodec {
    fn capacity_bits(&self, carrier: &ImageCarrier) -> usize {
        block_count(carrier.width() as usize, carrier.height() as usize) * CHANNELS
    }

    fn embed(&self, carrier: &mut ImageCarrier, bits: &[u8]) -> Result<()> {
        embed_sign_bits(self, carrier, bits, self.magnitude())
    }

    fn extract(&self, carrier: &ImageCarrier, limit: usize) -> Vec<u8> {
        let limit = limit.min(self.capacity_bits(carrier));
        extract_sign_bits(self, carrier, limit)
    }
}
