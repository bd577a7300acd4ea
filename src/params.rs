//! Embedding parameters and named presets.
//!
//! The same [`EmbeddingParameters`] must be supplied to decode as were used
//! to encode; nothing about them is stored in the carrier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::carrier::CarrierKind;
use crate::error::{Result, StegoError};

/// Valid range for `bits_per_channel`.
pub const BITS_PER_CHANNEL_RANGE: std::ops::RangeInclusive<u8> = 1..=4;

/// Valid range for DCT `strength`.
pub const DCT_STRENGTH_RANGE: std::ops::RangeInclusive<f64> = 1.0..=100.0;

/// Valid range for DWT `strength`.
pub const DWT_STRENGTH_RANGE: std::ops::RangeInclusive<f64> = 0.01..=10.0;

/// Embedding algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Spatial least-significant-bit replacement (image, audio, video).
    Lsb,
    /// Sign of a mid-frequency 8×8 DCT coefficient (image only).
    Dct,
    /// Sign of a Haar detail coefficient (image only).
    Dwt,
}

impl Algorithm {
    /// Whether this algorithm can embed into the given carrier type.
    pub fn supports(self, kind: CarrierKind) -> bool {
        match self {
            Algorithm::Lsb => true,
            Algorithm::Dct | Algorithm::Dwt => kind == CarrierKind::Image,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Lsb => "lsb",
            Algorithm::Dct => "dct",
            Algorithm::Dwt => "dwt",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lsb" => Ok(Algorithm::Lsb),
            "dct" => Ok(Algorithm::Dct),
            "dwt" => Ok(Algorithm::Dwt),
            other => Err(StegoError::UnsupportedParameter(format!(
                "unknown algorithm '{}', expected lsb, dct or dwt",
                other
            ))),
        }
    }
}

/// Parameters controlling a single encode or decode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingParameters {
    pub algorithm: Algorithm,
    /// Low bits replaced per channel/sample (LSB only).
    pub bits_per_channel: u8,
    /// Coefficient magnitude (DCT: 1..=100, DWT: 0.01..=10).
    pub strength: f64,
    /// Embed into every `frame_skip`-th video frame.
    pub frame_skip: u32,
}

impl Default for EmbeddingParameters {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Lsb,
            bits_per_channel: 1,
            strength: 10.0,
            frame_skip: 1,
        }
    }
}

impl EmbeddingParameters {
    /// LSB parameters with the given bit width.
    pub fn lsb(bits_per_channel: u8) -> Self {
        Self {
            algorithm: Algorithm::Lsb,
            bits_per_channel,
            ..Default::default()
        }
    }

    /// LSB parameters for video with the given bit width and frame skip.
    pub fn video(bits_per_channel: u8, frame_skip: u32) -> Self {
        Self {
            algorithm: Algorithm::Lsb,
            bits_per_channel,
            frame_skip,
            ..Default::default()
        }
    }

    /// DCT parameters with the given strength.
    pub fn dct(strength: f64) -> Self {
        Self {
            algorithm: Algorithm::Dct,
            strength,
            ..Default::default()
        }
    }

    /// DWT parameters with the given strength.
    pub fn dwt(strength: f64) -> Self {
        Self {
            algorithm: Algorithm::Dwt,
            strength,
            ..Default::default()
        }
    }

    /// Default parameters for an algorithm: 1-bit LSB, DCT strength 10, DWT strength 0.1.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Lsb => Self::lsb(1),
            Algorithm::Dct => Self::dct(10.0),
            Algorithm::Dwt => Self::dwt(0.1),
        }
    }

    /// Checks the parameters against the algorithm and carrier type.
    pub fn validate(&self, kind: CarrierKind) -> Result<()> {
        if !self.algorithm.supports(kind) {
            return Err(StegoError::UnsupportedParameter(format!(
                "algorithm {} cannot embed into {} carriers",
                self.algorithm, kind
            )));
        }

        match self.algorithm {
            Algorithm::Lsb => {
                if !BITS_PER_CHANNEL_RANGE.contains(&self.bits_per_channel) {
                    return Err(StegoError::UnsupportedParameter(format!(
                        "bits_per_channel must be between 1 and 4, got {}",
                        self.bits_per_channel
                    )));
                }
                if kind == CarrierKind::Video && self.frame_skip < 1 {
                    return Err(StegoError::UnsupportedParameter(format!(
                        "frame_skip must be at least 1, got {}",
                        self.frame_skip
                    )));
                }
            }
            Algorithm::Dct => {
                if !DCT_STRENGTH_RANGE.contains(&self.strength) {
                    return Err(StegoError::UnsupportedParameter(format!(
                        "DCT strength must be between 1 and 100, got {}",
                        self.strength
                    )));
                }
            }
            Algorithm::Dwt => {
                if !DWT_STRENGTH_RANGE.contains(&self.strength) {
                    return Err(StegoError::UnsupportedParameter(format!(
                        "DWT strength must be between 0.01 and 10, got {}",
                        self.strength
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Named parameter bundles trading stealth for capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Minimal detectability, lower capacity.
    Stealth,
    /// Balance between capacity and stealth.
    Balanced,
    /// Higher capacity, more detectable.
    Capacity,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Stealth, Preset::Balanced, Preset::Capacity];

    /// Parameters this preset uses for an algorithm on a carrier type.
    pub fn parameters(self, algorithm: Algorithm, kind: CarrierKind) -> EmbeddingParameters {
        let (bits, dct, dwt, skip) = match self {
            Preset::Stealth => (1, 5.0, 0.05, 2),
            Preset::Balanced => (2, 10.0, 0.1, 1),
            Preset::Capacity => (4, 20.0, 0.2, 1),
        };
        let frame_skip = if kind == CarrierKind::Video { skip } else { 1 };

        match algorithm {
            Algorithm::Lsb => EmbeddingParameters::video(bits, frame_skip),
            Algorithm::Dct => EmbeddingParameters::dct(dct),
            Algorithm::Dwt => EmbeddingParameters::dwt(dwt),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Stealth => "stealth",
            Preset::Balanced => "balanced",
            Preset::Capacity => "capacity",
        };
        f.write_str(name)
    }
}

impl FromStr for Preset {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "stealth" => Ok(Preset::Stealth),
            "balanced" => Ok(Preset::Balanced),
            "capacity" => Ok(Preset::Capacity),
            other => Err(StegoError::UnsupportedParameter(format!(
                "unknown preset '{}', expected stealth, balanced or capacity",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_range() {
        let kind = CarrierKind::Image;
        assert!(EmbeddingParameters::lsb(0).validate(kind).is_err());
        assert!(EmbeddingParameters::lsb(1).validate(kind).is_ok());
        assert!(EmbeddingParameters::lsb(4).validate(kind).is_ok());
        assert!(EmbeddingParameters::lsb(5).validate(kind).is_err());
    }

    #[test]
    fn test_strength_ranges() {
        let kind = CarrierKind::Image;
        assert!(EmbeddingParameters::dct(0.5).validate(kind).is_err());
        assert!(EmbeddingParameters::dct(15.0).validate(kind).is_ok());
        assert!(EmbeddingParameters::dct(100.5).validate(kind).is_err());
        assert!(EmbeddingParameters::dwt(0.001).validate(kind).is_err());
        assert!(EmbeddingParameters::dwt(0.1).validate(kind).is_ok());
        assert!(EmbeddingParameters::dwt(10.5).validate(kind).is_err());
    }

    #[test]
    fn test_frame_skip_zero_rejected() {
        let params = EmbeddingParameters::video(1, 0);
        assert!(matches!(
            params.validate(CarrierKind::Video),
            Err(StegoError::UnsupportedParameter(_))
        ));
    }

    #[test]
    fn test_transform_algorithms_image_only() {
        assert!(EmbeddingParameters::dct(10.0).validate(CarrierKind::Audio).is_err());
        assert!(EmbeddingParameters::dwt(0.1).validate(CarrierKind::Video).is_err());
        assert!(EmbeddingParameters::lsb(2).validate(CarrierKind::Audio).is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for preset in Preset::ALL {
            for algorithm in [Algorithm::Lsb, Algorithm::Dct, Algorithm::Dwt] {
                let params = preset.parameters(algorithm, CarrierKind::Image);
                assert!(params.validate(CarrierKind::Image).is_ok(), "{preset} {algorithm}");
            }
        }
        let stealth_video = Preset::Stealth.parameters(Algorithm::Lsb, CarrierKind::Video);
        assert_eq!(stealth_video.frame_skip, 2);
        assert_eq!(stealth_video.bits_per_channel, 1);
    }

    #[test]
    fn test_algorithm_defaults_validate() {
        for algorithm in [Algorithm::Lsb, Algorithm::Dct, Algorithm::Dwt] {
            let params = EmbeddingParameters::for_algorithm(algorithm);
            assert_eq!(params.algorithm, algorithm);
            assert!(params.validate(CarrierKind::Image).is_ok());
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("DCT".parse::<Algorithm>().unwrap(), Algorithm::Dct);
        assert_eq!("balanced".parse::<Preset>().unwrap(), Preset::Balanced);
        assert!("fft".parse::<Algorithm>().is_err());
    }
}
