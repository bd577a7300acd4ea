//! LSB steganography for images.
//!
//! Pixels are scanned row by row, channels in R, G, B order.

use crate::carrier::image::CHANNELS;
use crate::carrier::ImageCarrier;
use crate::codec::Codec;

use crate::error::Result;

use super::{check_width, embed_units, extract_units};

/// Image LSB codec.
#[derive(Debug, Clone, Copy)]
pub struct LsbImage {
    bits_per_channel: u8,
}

impl LsbImage {
    /// Fails unless `bits_per_channel` is in `1..=4`.
    pub fn new(bits_per_channel: u8) -> Result<Self> {
        Ok(Self {
            bits_per_channel: check_width(bits_per_channel)?,
        })
    }
}

impl Codec<ImageCarrier> for LsbImage {
    fn capacity_bits(&self, carrier: &ImageCarrier) -> usize {
        carrier.width() as usize * carrier.height() as usize * CHANNELS * self.bits_per_channel as usize
    }

    fn embed(&self, carrier: &mut ImageCarrier, bits: &[u8]) -> Result<()> {
        embed_units(carrier.pixels_mut(), bits, self.bits_per_channel);
        Ok(())
    }

    fn extract(&self, carrier: &ImageCarrier, limit: usize) -> Vec<u8> {
        extract_units(carrier.pixels(), self.bits_per_channel, limit)
    }
}
