//! LSB steganography for PCM audio.
//!
//! Samples are used in interleaved order (frame by frame, channels in file
//! order), one group of `bits_per_channel` bits per sample.

use crate::carrier::AudioCarrier;
use crate::codec::Codec;

use crate::error::Result;

use super::{check_width, embed_units, extract_units};

/// Audio LSB codec.
#[derive(Debug, Clone, Copy)]
pub struct LsbAudio {
    bits_per_channel: u8,
}

impl LsbAudio {
    /// Fails unless `bits_per_channel` is in `1..=4`.
    pub fn new(bits_per_channel: u8) -> Result<Self> {
        Ok(Self {
            bits_per_channel: check_width(bits_per_channel)?,
        })
    }
}

impl Codec<AudioCarrier> for LsbAudio {
    fn capacity_bits(&self, carrier: &AudioCarrier) -> usize {
        carrier.sample_count() * self.bits_per_channel as usize
    }

    fn embed(&self, carrier: &mut AudioCarrier, bits: &[u8]) -> Result<()> {
        let (min, max) = carrier.sample_range();
        let samples = carrier.samples_mut();
        let touched = embed_units(samples, bits, self.bits_per_channel);

        for sample in &mut samples[..touched] {
            *sample = (*sample).clamp(min, max);
        }
        Ok(())
    }

    fn extract(&self, carrier: &AudioCarrier, limit: usize) -> Vec<u8> {
        extract_units(carrier.samples(), self.bits_per_channel, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(bits_per_sample: u16, channels: u16) -> AudioCarrier {
        let peak = (1i32 << (bits_per_sample - 1)) - 1;
        let samples = (0..800)
            .map(|i| match i % 4 {
                0 => peak,
                1 => -peak - 1,
                _ => (f64::sin(i as f64 * 0.1) * peak as f64 / 2.0) as i32,
            })
            .collect();
        AudioCarrier::new(channels, 8000, bits_per_sample, samples).unwrap()
    }

    #[test]
    fn test_roundtrip_depths_and_widths() {
        let bits: Vec<u8> = (0..700).map(|i| (i % 5 < 2) as u8).collect();

        for depth in [8u16, 16, 24] {
            for width in 1..=4 {
                let codec = LsbAudio::new(width).unwrap();
                let mut carrier = tone(depth, 2);

                codec.embed(&mut carrier, &bits).unwrap();
                assert_eq!(codec.extract(&carrier, bits.len()), bits, "{depth}-bit width {width}");

                let (min, max) = carrier.sample_range();
                assert!(carrier.samples().iter().all(|s| (min..=max).contains(s)));
            }
        }
    }

    #[test]
    fn test_survives_wav_encoding() {
        let codec = LsbAudio::new(2).unwrap();
        let mut carrier = tone(16, 1);
        let bits: Vec<u8> = (0..300).map(|i| (i % 3 == 0) as u8).collect();

        codec.embed(&mut carrier, &bits).unwrap();
        let reloaded = AudioCarrier::from_bytes(&carrier.to_wav_bytes().unwrap()).unwrap();

        assert_eq!(codec.extract(&reloaded, bits.len()), bits);
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(LsbAudio::new(0).is_err());
    }

    #[test]
    fn test_capacity_counts_every_channel() {
        let carrier = tone(16, 2);
        assert_eq!(LsbAudio::new(3).unwrap().capacity_bits(&carrier), 800 * 3);
    }
}
