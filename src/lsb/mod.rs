//! Spatial least-significant-bit codecs.
//!
//! Supports:
//! - Image pixel channels ([`LsbImage`])
//! - PCM audio samples ([`LsbAudio`])
//! - Video frame pixels ([`LsbVideo`])
//!
//! All three share one primitive: the next `bits_per_channel` bits of the
//! stream (MSB first, zero-padded at the end) replace the low bits of the next
//! unit in scan order.

pub mod audio;
pub mod image;
pub mod video;

pub use self::audio::LsbAudio;
pub use self::image::LsbImage;
pub use self::video::LsbVideo;

use crate::error::{Result, StegoError};
use crate::params::BITS_PER_CHANNEL_RANGE;

/// Rejects group widths outside `1..=4`.
pub(crate) fn check_width(bits_per_channel: u8) -> Result<u8> {
    if BITS_PER_CHANNEL_RANGE.contains(&bits_per_channel) {
        Ok(bits_per_channel)
    } else {
        Err(StegoError::UnsupportedParameter(format!(
            "bits_per_channel must be between 1 and 4, got {}",
            bits_per_channel
        )))
    }
}

/// A value whose low bits can carry payload bits.
pub(crate) trait LsbUnit: Copy {
    /// Returns `self` with the low `width` bits replaced by `value`.
    fn with_low_bits(self, value: u32, width: u8) -> Self;

    /// The low `width` bits of `self`.
    fn low_bits(self, width: u8) -> u32;
}

impl LsbUnit for u8 {
    fn with_low_bits(self, value: u32, width: u8) -> Self {
        let mask = low_mask(width) as u8;
        (self & !mask) | (value as u8 & mask)
    }

    fn low_bits(self, width: u8) -> u32 {
        (self as u32) & low_mask(width)
    }
}

// Two's complement low bits. Replacing them never leaves the 2^width-aligned
// block the sample is in, so 8/16/24-bit ranges are preserved.
impl LsbUnit for i32 {
    fn with_low_bits(self, value: u32, width: u8) -> Self {
        let mask = low_mask(width) as i32;
        (self & !mask) | (value as i32 & mask)
    }

    fn low_bits(self, width: u8) -> u32 {
        (self as u32) & low_mask(width)
    }
}

fn low_mask(width: u8) -> u32 {
    (1u32 << width) - 1
}

/// Number of units needed to carry `bit_count` bits at `width` bits per unit.
pub(crate) fn units_for(bit_count: usize, width: u8) -> usize {
    bit_count.div_ceil(width as usize)
}

/// Writes `bits` into the low bits of `units`, `width` bits per unit.
///
/// The last group is zero-padded on the right. Returns the number of units
/// touched.
pub(crate) fn embed_units<U: LsbUnit>(units: &mut [U], bits: &[u8], width: u8) -> usize {
    let mut touched = 0;
    for (unit, group) in units.iter_mut().zip(bits.chunks(width as usize)) {
        let value = group.iter().fold(0u32, |acc, &bit| (acc << 1) | (bit & 1) as u32);
        let value = value << (width as usize - group.len());
        *unit = unit.with_low_bits(value, width);
        touched += 1;
    }
    touched
}

/// Reads up to `limit` bits from the low bits of `units`.
pub(crate) fn extract_units<U: LsbUnit>(units: &[U], width: u8, limit: usize) -> Vec<u8> {
    let take = units_for(limit, width).min(units.len());
    let mut bits = Vec::with_capacity(take * width as usize);
    for unit in &units[..take] {
        let value = unit.low_bits(width);
        for shift in (0..width).rev() {
            bits.push(((value >> shift) & 1) as u8);
        }
    }
    bits.truncate(limit);
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_bit_per_unit() {
        let mut units = [0b1010_1010u8, 0b0101_0101, 0xFF];
        let touched = embed_units(&mut units, &[1, 0, 0], 1);

        assert_eq!(touched, 3);
        assert_eq!(units, [0b1010_1011, 0b0101_0100, 0xFE]);
        assert_eq!(extract_units(&units, 1, 3), vec![1, 0, 0]);
    }

    #[test]
    fn test_last_group_zero_padded() {
        let mut units = [0xFFu8; 2];
        embed_units(&mut units, &[1, 0, 1, 1, 1], 3);

        assert_eq!(units[0] & 0b111, 0b101);
        assert_eq!(units[1] & 0b111, 0b110);
        assert_eq!(extract_units(&units, 3, 5), vec![1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_negative_samples_keep_sign() {
        let mut samples = [-32768i32, -1, 32767, 0];
        embed_units(&mut samples, &[1, 1, 1, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 1], 4);

        assert_eq!(samples[0], -32768 + 0b1111);
        assert_eq!(samples[1], -16);
        assert_eq!(samples[2], 32767 - 0b0101);
        assert_eq!(samples[3], 0b0101);
        assert!(samples.iter().all(|s| (-32768..=32767).contains(s)));
    }

    #[test]
    fn test_width_checked() {
        assert_eq!(check_width(1).unwrap(), 1);
        assert_eq!(check_width(4).unwrap(), 4);
        assert!(matches!(check_width(0), Err(StegoError::UnsupportedParameter(_))));
        assert!(matches!(check_width(32), Err(StegoError::UnsupportedParameter(_))));
    }

    #[test]
    fn test_extract_limit_clamped_to_units() {
        let units = [1u8, 0, 1];
        assert_eq!(extract_units(&units, 2, 100).len(), 6);
        assert!(extract_units(&units, 2, 0).is_empty());
    }
}
