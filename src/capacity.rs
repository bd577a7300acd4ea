//! Capacity planning.
//!
//! Computes how many bits a carrier can hold for an algorithm and parameter
//! set, reserves an overhead margin, and rejects oversized envelopes before
//! any carrier byte is touched.

use serde::Serialize;

use crate::carrier::Carrier;
use crate::codec::Codec;
use crate::crypto::TAG_SIZE;
use crate::envelope::header_size;
use crate::error::{Result, StegoError};
use crate::lsb::{LsbAudio, LsbImage, LsbVideo};
use crate::params::{Algorithm, EmbeddingParameters};
use crate::transform::{DctCodec, DwtCodec};

/// Default share of raw capacity held back for framing.
pub const DEFAULT_OVERHEAD_MARGIN: f64 = 0.05;

/// Capacity of one carrier under one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityReport {
    /// Every bit the codec could write.
    pub raw_bits: usize,
    /// Bits held back by the overhead margin.
    pub reserved_bits: usize,
    /// Bits an envelope may occupy.
    pub usable_bits: usize,
}

impl CapacityReport {
    /// Builds a report from a raw bit count and overhead margin.
    pub fn new(raw_bits: usize, overhead_margin: f64) -> Self {
        let reserved_bits = ((raw_bits as f64) * overhead_margin).ceil() as usize;
        let reserved_bits = reserved_bits.min(raw_bits);
        Self {
            raw_bits,
            reserved_bits,
            usable_bits: raw_bits - reserved_bits,
        }
    }

    /// Raw capacity in whole bytes.
    pub fn raw_bytes(&self) -> usize {
        self.raw_bits / 8
    }

    /// Usable capacity in whole bytes, framing included.
    pub fn usable_bytes(&self) -> usize {
        self.usable_bits / 8
    }

    /// Largest payload that still fits once framing (and the GCM tag, when
    /// encrypted) is accounted for.
    pub fn max_payload_bytes(&self, encrypted: bool) -> usize {
        let overhead = header_size(encrypted) + if encrypted { TAG_SIZE } else { 0 };
        self.usable_bytes().saturating_sub(overhead)
    }

    /// Fails with [`StegoError::CapacityExceeded`] if `framed_bits` do not fit.
    pub fn ensure_fits(&self, framed_bits: usize) -> Result<()> {
        if framed_bits > self.usable_bits {
            return Err(StegoError::CapacityExceeded {
                needed: framed_bits,
                usable: self.usable_bits,
            });
        }
        Ok(())
    }

    /// Fraction of usable capacity `framed_bits` would occupy, in percent.
    pub fn utilization(&self, framed_bits: usize) -> f64 {
        if self.usable_bits == 0 {
            return 100.0;
        }
        framed_bits as f64 / self.usable_bits as f64 * 100.0
    }
}

/// Number of video frames that take part in embedding.
pub fn selected_frame_count(frame_count: usize, frame_skip: u32) -> usize {
    frame_count / frame_skip.max(1) as usize
}

/// Raw bit capacity of a carrier for the given parameters.
///
/// Algorithm/carrier pairs that cannot embed report 0; see
/// [`EmbeddingParameters::validate`] for the full parameter check.
pub fn raw_capacity_bits(carrier: &Carrier, params: &EmbeddingParameters) -> Result<usize> {
    let bits = params.bits_per_channel;
    let raw = match (carrier, params.algorithm) {
        (Carrier::Image(image), Algorithm::Lsb) => LsbImage::new(bits)?.capacity_bits(image),
        (Carrier::Audio(audio), Algorithm::Lsb) => LsbAudio::new(bits)?.capacity_bits(audio),
        (Carrier::Video(video), Algorithm::Lsb) => {
            LsbVideo::new(bits, params.frame_skip)?.capacity_bits(video)
        }
        (Carrier::Image(image), Algorithm::Dct) => DctCodec::new(params.strength).capacity_bits(image),
        (Carrier::Image(image), Algorithm::Dwt) => DwtCodec::new(params.strength).capacity_bits(image),
        _ => 0,
    };
    Ok(raw)
}

/// Validates parameters and computes the capacity report for a carrier.
pub fn plan(
    carrier: &Carrier,
    params: &EmbeddingParameters,
    overhead_margin: f64,
) -> Result<CapacityReport> {
    params.validate(carrier.kind())?;
    if !(0.0..0.5).contains(&overhead_margin) {
        return Err(StegoError::UnsupportedParameter(format!(
            "overhead margin must be in [0, 0.5), got {}",
            overhead_margin
        )));
    }
    Ok(CapacityReport::new(
        raw_capacity_bits(carrier, params)?,
        overhead_margin,
    ))
}
