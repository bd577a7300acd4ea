//! Encode and decode entry points.
//!
//! Encode: payload → optional encryption → envelope → capacity check → embed.
//! Decode: extract → envelope → optional decryption → payload.
//!
//! The carrier passed to [`encode`] is never modified; the stego carrier is
//! returned in [`EncodeOutcome`].

use log::{debug, warn};
use serde::Serialize;

use crate::bits::BitSource;
use crate::capacity::{plan, CapacityReport};
use crate::carrier::Carrier;
use crate::config::CodecConfig;
use crate::crypto::{self, TAG_SIZE};
use crate::envelope::{header_size, Body, Envelope};
use crate::error::{Result, StegoError};
use crate::lsb::{LsbAudio, LsbImage, LsbVideo};
use crate::metrics::QualityReport;
use crate::params::{Algorithm, EmbeddingParameters};
use crate::transform::{DctCodec, DwtCodec};

/// Embedding algorithm bound to one carrier type.
pub trait Codec<C> {
    /// Number of bits the carrier can hold.
    fn capacity_bits(&self, carrier: &C) -> usize;

    /// Writes `bits` in scan order. Callers check capacity first.
    ///
    /// On error the carrier may be partially written and must be discarded.
    fn embed(&self, carrier: &mut C, bits: &[u8]) -> Result<()>;

    /// Reads the first `limit` bits in scan order, or fewer if the carrier
    /// holds fewer.
    fn extract(&self, carrier: &C, limit: usize) -> Vec<u8>;
}

/// Lazily extracted bitstream of one carrier.
struct Extraction<'a, K, C> {
    codec: K,
    carrier: &'a C,
    available: usize,
}

impl<'a, K: Codec<C>, C> Extraction<'a, K, C> {
    fn new(codec: K, carrier: &'a C) -> Self {
        let available = codec.capacity_bits(carrier);
        Self {
            codec,
            carrier,
            available,
        }
    }
}

impl<K: Codec<C>, C> BitSource for Extraction<'_, K, C> {
    fn pull(&mut self, count: usize) -> Vec<u8> {
        self.codec.extract(self.carrier, count.min(self.available))
    }

    fn available(&self) -> usize {
        self.available
    }
}

/// Result of a successful encode.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    /// The stego carrier.
    pub carrier: Carrier,
    /// PSNR/SSIM against the input, for image carriers.
    pub quality: Option<QualityReport>,
    pub capacity: CapacityReport,
    /// Framed envelope size in bits.
    pub envelope_bits: usize,
}

/// Summary of an encode suitable for printing or serializing.
#[derive(Debug, Clone, Serialize)]
pub struct EncodeSummary {
    pub envelope_bits: usize,
    pub capacity: CapacityReport,
    pub utilization_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
}

impl EncodeOutcome {
    pub fn summary(&self) -> EncodeSummary {
        EncodeSummary {
            envelope_bits: self.envelope_bits,
            capacity: self.capacity,
            utilization_percent: self.capacity.utilization(self.envelope_bits),
            quality: self.quality,
        }
    }
}

fn mismatch(carrier: &Carrier, algorithm: Algorithm) -> StegoError {
    StegoError::UnsupportedParameter(format!(
        "algorithm {} cannot embed into {} carriers",
        algorithm,
        carrier.kind()
    ))
}

fn embed_bits(carrier: &mut Carrier, params: &EmbeddingParameters, bits: &[u8]) -> Result<()> {
    let width = params.bits_per_channel;
    match (&mut *carrier, params.algorithm) {
        (Carrier::Image(image), Algorithm::Lsb) => LsbImage::new(width)?.embed(image, bits),
        (Carrier::Audio(audio), Algorithm::Lsb) => LsbAudio::new(width)?.embed(audio, bits),
        (Carrier::Video(video), Algorithm::Lsb) => {
            LsbVideo::new(width, params.frame_skip)?.embed(video, bits)
        }
        (Carrier::Image(image), Algorithm::Dct) => DctCodec::new(params.strength).embed(image, bits),
        (Carrier::Image(image), Algorithm::Dwt) => DwtCodec::new(params.strength).embed(image, bits),
        (other, algorithm) => Err(mismatch(other, algorithm)),
    }
}

fn read_envelope(carrier: &Carrier, params: &EmbeddingParameters) -> Result<Envelope> {
    let width = params.bits_per_channel;
    match (carrier, params.algorithm) {
        (Carrier::Image(image), Algorithm::Lsb) => {
            Envelope::read_from(&mut Extraction::new(LsbImage::new(width)?, image))
        }
        (Carrier::Audio(audio), Algorithm::Lsb) => {
            Envelope::read_from(&mut Extraction::new(LsbAudio::new(width)?, audio))
        }
        (Carrier::Video(video), Algorithm::Lsb) => Envelope::read_from(&mut Extraction::new(
            LsbVideo::new(width, params.frame_skip)?,
            video,
        )),
        (Carrier::Image(image), Algorithm::Dct) => {
            Envelope::read_from(&mut Extraction::new(DctCodec::new(params.strength), image))
        }
        (Carrier::Image(image), Algorithm::Dwt) => {
            Envelope::read_from(&mut Extraction::new(DwtCodec::new(params.strength), image))
        }
        (other, algorithm) => Err(mismatch(other, algorithm)),
    }
}

/// Capacity of a carrier under the default configuration.
pub fn capacity(carrier: &Carrier, params: &EmbeddingParameters) -> Result<CapacityReport> {
    plan(carrier, params, CodecConfig::default().overhead_margin)
}

/// Hides `payload` in a copy of `carrier`, encrypting it when a passphrase is given.
pub fn encode(
    carrier: &Carrier,
    payload: &[u8],
    params: &EmbeddingParameters,
    passphrase: Option<&str>,
) -> Result<EncodeOutcome> {
    encode_with_config(carrier, payload, params, passphrase, &CodecConfig::default())
}

/// [`encode`] with explicit engine options.
pub fn encode_with_config(
    carrier: &Carrier,
    payload: &[u8],
    params: &EmbeddingParameters,
    passphrase: Option<&str>,
    config: &CodecConfig,
) -> Result<EncodeOutcome> {
    let report = plan(carrier, params, config.overhead_margin)?;

    if let Some(passphrase) = passphrase {
        crypto::validate_passphrase(passphrase)
            .map_err(|e| StegoError::UnsupportedParameter(e.to_string()))?;
    }

    let encrypted = passphrase.is_some();
    let body_len = payload.len() + if encrypted { TAG_SIZE } else { 0 };
    let needed = (header_size(encrypted) + body_len).saturating_mul(8);
    report.ensure_fits(needed)?;

    let envelope = match passphrase {
        Some(passphrase) => {
            Envelope::sealed(crypto::encrypt(payload, passphrase).map_err(StegoError::Encryption)?)
        }
        None => Envelope::plain(payload.to_vec()),
    };
    let bits = envelope.to_bits()?;

    debug!(
        "embedding {} bits ({}, encrypted: {}) into {}; usable {} of {} bits",
        bits.len(),
        params.algorithm,
        encrypted,
        carrier.describe(),
        report.usable_bits,
        report.raw_bits
    );

    let mut stego = carrier.clone();
    embed_bits(&mut stego, params, &bits)?;

    let quality = match (config.compute_metrics, carrier, &stego) {
        (true, Carrier::Image(original), Carrier::Image(modified)) => {
            Some(QualityReport::measure(original, modified)?)
        }
        _ => None,
    };

    Ok(EncodeOutcome {
        carrier: stego,
        quality,
        capacity: report,
        envelope_bits: bits.len(),
    })
}

/// Recovers the payload hidden with the same parameters.
///
/// A passphrase supplied for an unencrypted payload is ignored.
pub fn decode(
    carrier: &Carrier,
    params: &EmbeddingParameters,
    passphrase: Option<&str>,
) -> Result<Vec<u8>> {
    params.validate(carrier.kind())?;

    let envelope = read_envelope(carrier, params)?;
    debug!(
        "found envelope in {}: {} body bytes, encrypted: {}",
        carrier.describe(),
        envelope.body.len(),
        envelope.is_encrypted()
    );

    match envelope.into_body() {
        Body::Plain(payload) => {
            if passphrase.is_some() {
                warn!("payload is not encrypted; ignoring the supplied passphrase");
            }
            Ok(payload)
        }
        Body::Sealed(sealed) => {
            let passphrase = passphrase.ok_or(StegoError::PassphraseRequired)?;
            crypto::decrypt(&sealed, passphrase).map_err(StegoError::Decryption)
        }
    }
}
