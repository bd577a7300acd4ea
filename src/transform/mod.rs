//! Transform-domain codecs.
//!
//! Both codecs hide one bit per square block per channel in the sign of one
//! designated coefficient:
//! - [`DctCodec`]: coefficient (4, 4) of an orthonormal 8×8 DCT-II
//! - [`DwtCodec`]: horizontal detail of a one-level 2×2 Haar transform
//!
//! Blocks are visited channel-major (R, G, B), then block rows, then block
//! columns. A block is written back as rounded, clamped `u8` pixels and the
//! coefficient recomputed from them; if rounding or clamping flipped or
//! flattened the sign, the block is rewritten from its original pixels with a
//! larger magnitude. The first [`LINEAR_ATTEMPTS`] magnitudes grow by one step,
//! later ones double, and the last one drives every pixel of the block to 0 or
//! 255. A block that is still unstable after that fails the embed.

pub mod dct;
pub mod dwt;

use std::iter;

use log::debug;
use rayon::prelude::*;

use crate::carrier::image::CHANNELS;
use crate::carrier::ImageCarrier;
use crate::error::{Result, StegoError};

pub use self::dct::DctCodec;
pub use self::dwt::DwtCodec;

/// Attempts whose magnitude grows by one step before it starts doubling.
pub const LINEAR_ATTEMPTS: usize = 8;

/// Smallest coefficient magnitude accepted after rounding.
pub const MIN_STABLE_MAGNITUDE: f64 = 0.5;

/// A square block transform exposing one designated coefficient.
pub(crate) trait BlockTransform: Sync {
    /// Block edge length in pixels.
    fn size(&self) -> usize;

    /// The designated coefficient of a row-major block.
    fn coefficient(&self, block: &[f64]) -> f64;

    /// Spatial block with the designated coefficient replaced by `value`.
    fn with_coefficient(&self, block: &[f64], value: f64) -> Vec<f64>;
}

/// Top-left corner of one block within one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockPos {
    pub channel: usize,
    pub x: usize,
    pub y: usize,
}

/// Number of whole `size`×`size` blocks in an image.
pub(crate) fn whole_blocks(width: usize, height: usize, size: usize) -> usize {
    (width / size) * (height / size)
}

/// Block positions in traversal order.
pub(crate) fn block_positions(width: usize, height: usize, size: usize) -> impl Iterator<Item = BlockPos> {
    let cols = width / size;
    let rows = height / size;
    (0..CHANNELS).flat_map(move |channel| {
        (0..rows).flat_map(move |row| {
            (0..cols).map(move |col| BlockPos {
                channel,
                x: col * size,
                y: row * size,
            })
        })
    })
}

fn read_block(pixels: &[u8], width: usize, pos: BlockPos, size: usize) -> Vec<f64> {
    let mut block = Vec::with_capacity(size * size);
    for dy in 0..size {
        for dx in 0..size {
            let index = ((pos.y + dy) * width + pos.x + dx) * CHANNELS + pos.channel;
            block.push(pixels[index] as f64);
        }
    }
    block
}

fn write_block(pixels: &mut [u8], width: usize, pos: BlockPos, size: usize, block: &[u8]) {
    for dy in 0..size {
        for dx in 0..size {
            let index = ((pos.y + dy) * width + pos.x + dx) * CHANNELS + pos.channel;
            pixels[index] = block[dy * size + dx];
        }
    }
}

fn quantize(block: &[f64]) -> Vec<u8> {
    block.iter().map(|v| v.round().clamp(0.0, 255.0) as u8).collect()
}

/// Coefficient magnitude that saturates any block of `size`×`size` pixels.
///
/// Every basis function used here has entries of at least `1 / size` in
/// magnitude and no input coefficient exceeds `255 * size`, so this target
/// moves each pixel by at least the full pixel range.
fn saturating_magnitude(size: usize) -> f64 {
    255.0 * (size * size) as f64
}

/// Magnitudes tried for one block, in order, ending at `limit`.
fn boost_schedule(step: f64, limit: f64) -> impl Iterator<Item = f64> {
    let linear = (1..=LINEAR_ATTEMPTS).map(move |k| step * k as f64);
    let doubling = iter::successors(Some(step * (2 * LINEAR_ATTEMPTS) as f64), |m| Some(m * 2.0));
    linear
        .chain(doubling)
        .take_while(move |&m| m < limit)
        .chain(iter::once(limit))
}

/// Rewrites one block so its coefficient carries `bit`.
///
/// Returns `None` when no magnitude produced a stable sign.
fn embed_block<T: BlockTransform>(transform: &T, original: &[f64], bit: u8, step: f64) -> Option<Vec<u8>> {
    let sign = if bit == 1 { 1.0 } else { -1.0 };
    let limit = saturating_magnitude(transform.size());

    boost_schedule(step, limit).enumerate().find_map(|(attempt, magnitude)| {
        let quantized = quantize(&transform.with_coefficient(original, sign * magnitude));
        let spatial: Vec<f64> = quantized.iter().map(|&p| p as f64).collect();
        let actual = transform.coefficient(&spatial);

        if actual * sign >= MIN_STABLE_MAGNITUDE {
            if attempt >= LINEAR_ATTEMPTS {
                debug!("block needed magnitude {:.1} to hold its sign", magnitude);
            }
            Some(quantized)
        } else {
            None
        }
    })
}

/// Embeds one bit per block, in traversal order. `step` is the initial
/// coefficient magnitude and the boost increment.
///
/// Fails with [`StegoError::EmbeddingFailed`] if any block cannot hold its
/// bit; the carrier must then be discarded.
pub(crate) fn embed_sign_bits<T: BlockTransform>(
    transform: &T,
    carrier: &mut ImageCarrier,
    bits: &[u8],
    step: f64,
) -> Result<()> {
    let width = carrier.width() as usize;
    let height = carrier.height() as usize;
    let size = transform.size();
    let pixels = carrier.pixels_mut();

    for (index, (pos, &bit)) in block_positions(width, height, size).zip(bits).enumerate() {
        let original = read_block(pixels, width, pos, size);
        let block = embed_block(transform, &original, bit, step).ok_or_else(|| {
            StegoError::EmbeddingFailed(format!(
                "block {} (channel {}, x {}, y {}) cannot hold a stable coefficient sign",
                index, pos.channel, pos.x, pos.y
            ))
        })?;
        write_block(pixels, width, pos, size, &block);
    }

    debug!("embedded {} bits into {}x{} blocks", bits.len(), size, size);
    Ok(())
}

/// Reads up to `limit` bits, one per block, in traversal order.
pub(crate) fn extract_sign_bits<T: BlockTransform>(
    transform: &T,
    carrier: &ImageCarrier,
    limit: usize,
) -> Vec<u8> {
    let width = carrier.width() as usize;
    let height = carrier.height() as usize;
    let size = transform.size();
    let pixels = carrier.pixels();

    let positions: Vec<BlockPos> = block_positions(width, height, size).take(limit).collect();
    positions
        .par_iter()
        .map(|&pos| {
            let block = read_block(pixels, width, pos, size);
            (transform.coefficient(&block) > 0.0) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::dwt::HaarBlock;

    #[test]
    fn test_traversal_is_channel_major() {
        let positions: Vec<BlockPos> = block_positions(16, 8, 8).collect();

        assert_eq!(positions.len(), 2 * 3);
        assert_eq!(positions[0], BlockPos { channel: 0, x: 0, y: 0 });
        assert_eq!(positions[1], BlockPos { channel: 0, x: 8, y: 0 });
        assert_eq!(positions[2], BlockPos { channel: 1, x: 0, y: 0 });
        assert_eq!(positions[5], BlockPos { channel: 2, x: 8, y: 0 });
    }

    #[test]
    fn test_boost_schedule() {
        let magnitudes: Vec<f64> = boost_schedule(1.0, 1020.0).collect();

        assert_eq!(&magnitudes[..LINEAR_ATTEMPTS], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(&magnitudes[LINEAR_ATTEMPTS..], &[16.0, 32.0, 64.0, 128.0, 256.0, 512.0, 1020.0]);

        let coarse: Vec<f64> = boost_schedule(400.0, 1020.0).collect();
        assert_eq!(coarse, vec![400.0, 800.0, 1020.0]);
    }

    #[test]
    fn test_clamped_block_keeps_boosting() {
        let codec = DwtCodec::new(0.01);
        let original = [0.0, 0.0, 0.0, 52.0];

        let block = embed_block(&codec, &original, 1, codec.magnitude()).unwrap();
        let spatial: Vec<f64> = block.iter().map(|&p| p as f64).collect();
        assert!(HaarBlock::forward(&spatial).lh >= MIN_STABLE_MAGNITUDE);
    }

    #[test]
    fn test_opposite_extreme_block_flips() {
        let dwt = DwtCodec::new(0.01);
        let block = embed_block(&dwt, &[0.0, 0.0, 255.0, 255.0], 1, dwt.magnitude()).unwrap();
        let spatial: Vec<f64> = block.iter().map(|&p| p as f64).collect();
        assert!(dwt.coefficient(&spatial) > 0.0);

        // Most negative (4, 4) coefficient an 8-bit block can have.
        let dct = DctCodec::new(1.0);
        let weight = |n: usize| ((2 * n + 1) as f64 * std::f64::consts::PI / 4.0).cos();
        let checker: Vec<f64> = (0..64)
            .map(|i| if weight(i / 8) * weight(i % 8) > 0.0 { 0.0 } else { 255.0 })
            .collect();
        assert!(dct.coefficient(&checker) < -1000.0);

        let block = embed_block(&dct, &checker, 1, 1.0).unwrap();
        let spatial: Vec<f64> = block.iter().map(|&p| p as f64).collect();
        assert!(dct.coefficient(&spatial) >= MIN_STABLE_MAGNITUDE);
    }

    #[test]
    fn test_partial_blocks_skipped() {
        assert_eq!(whole_blocks(17, 15, 8), 2);
        assert_eq!(block_positions(7, 100, 8).count(), 0);
    }

    #[test]
    fn test_block_read_write_roundtrip() {
        let mut carrier = ImageCarrier::from_raw(4, 4, (0..48).collect()).unwrap();
        let pos = BlockPos { channel: 1, x: 2, y: 2 };

        let block = read_block(carrier.pixels(), 4, pos, 2);
        assert_eq!(block, vec![31.0, 34.0, 43.0, 46.0]);

        write_block(carrier.pixels_mut(), 4, pos, 2, &[1, 2, 3, 4]);
        assert_eq!(read_block(carrier.pixels(), 4, pos, 2), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
