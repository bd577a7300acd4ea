//! LSB steganography for video frame sequences.
//!
//! Only frames `k * frame_skip` for `k < frame_count / frame_skip` carry data.
//! Each selected frame is scanned like an image and the stream continues from
//! one selected frame to the next.

use log::debug;

use crate::capacity::selected_frame_count;
use crate::carrier::image::CHANNELS;
use crate::carrier::VideoCarrier;
use crate::codec::Codec;

use crate::error::Result;

use super::{check_width, embed_units, extract_units};

/// Video LSB codec.
#[derive(Debug, Clone, Copy)]
pub struct LsbVideo {
    bits_per_channel: u8,
    frame_skip: u32,
}

impl LsbVideo {
    /// Fails unless `bits_per_channel` is in `1..=4`. A `frame_skip` of 0 is
    /// treated as 1.
    pub fn new(bits_per_channel: u8, frame_skip: u32) -> Result<Self> {
        Ok(Self {
            bits_per_channel: check_width(bits_per_channel)?,
            frame_skip: frame_skip.max(1),
        })
    }

    /// Indices of the frames that carry data, in stream order.
    pub fn selected_frames(&self, frame_count: usize) -> impl Iterator<Item = usize> {
        let step = self.frame_skip as usize;
        (0..selected_frame_count(frame_count, self.frame_skip)).map(move |k| k * step)
    }

    fn bits_per_frame(&self, carrier: &VideoCarrier) -> usize {
        carrier.width() as usize * carrier.height() as usize * CHANNELS * self.bits_per_channel as usize
    }
}

impl Codec<VideoCarrier> for LsbVideo {
    fn capacity_bits(&self, carrier: &VideoCarrier) -> usize {
        selected_frame_count(carrier.frame_count(), self.frame_skip) * self.bits_per_frame(carrier)
    }

    fn embed(&self, carrier: &mut VideoCarrier, bits: &[u8]) -> Result<()> {
        let per_frame = self.bits_per_frame(carrier);
        if per_frame == 0 {
            return Ok(());
        }
        let selected: Vec<usize> = self.selected_frames(carrier.frame_count()).collect();
        let frames = carrier.frames_mut();

        let mut used = 0;
        for (index, chunk) in selected.into_iter().zip(bits.chunks(per_frame)) {
            embed_units(&mut *frames[index], chunk, self.bits_per_channel);
            used += 1;
        }
        debug!("embedded {} bits across {} video frames", bits.len(), used);
        Ok(())
    }

    fn extract(&self, carrier: &VideoCarrier, limit: usize) -> Vec<u8> {
        let per_frame = self.bits_per_frame(carrier);
        let mut bits = Vec::with_capacity(limit.min(self.capacity_bits(carrier)));

        for index in self.selected_frames(carrier.frame_count()) {
            if bits.len() >= limit {
                break;
            }
            let wanted = (limit - bits.len()).min(per_frame);
            bits.extend(extract_units(carrier.frames()[index].as_raw().as_slice(), self.bits_per_channel, wanted));
        }
        bits
    }
}
