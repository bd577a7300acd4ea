//! PCM audio carriers.
//!
//! Holds interleaved integer samples (8, 16 or 24 bits) widened to `i32`.
//! Supports WAV files (uncompressed PCM).

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::CarrierError;

/// Audio carrier: format description plus interleaved samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioCarrier {
    /// Audio specification (sample rate, channels, bit depth)
    spec: WavSpec,
    /// Interleaved samples, each within the signed range of `spec.bits_per_sample`
    samples: Vec<i32>,
}

impl AudioCarrier {
    /// Creates an audio carrier from interleaved samples.
    pub fn new(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        samples: Vec<i32>,
    ) -> Result<Self, CarrierError> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format: SampleFormat::Int,
        };
        Self::validate_spec(&spec)?;
        if channels == 0 || samples.len() % channels as usize != 0 {
            return Err(CarrierError::Load(format!(
                "{} samples cannot be split into {} channels",
                samples.len(),
                channels
            )));
        }

        let (min, max) = sample_range(bits_per_sample);
        if let Some(bad) = samples.iter().find(|s| **s < min || **s > max) {
            return Err(CarrierError::Load(format!(
                "sample {} outside {}-bit range",
                bad, bits_per_sample
            )));
        }

        Ok(Self { spec, samples })
    }

    /// Loads audio from a WAV file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CarrierError> {
        let reader = WavReader::open(path).map_err(|e| CarrierError::Load(e.to_string()))?;
        Self::from_reader(reader)
    }

    /// Loads audio from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CarrierError> {
        let reader =
            WavReader::new(Cursor::new(bytes)).map_err(|e| CarrierError::Load(e.to_string()))?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, CarrierError> {
        let spec = reader.spec();
        Self::validate_spec(&spec)?;

        let samples: Vec<i32> = reader
            .into_samples::<i32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CarrierError::Load(e.to_string()))?;

        Ok(Self { spec, samples })
    }

    fn validate_spec(spec: &WavSpec) -> Result<(), CarrierError> {
        if spec.sample_format != SampleFormat::Int || !matches!(spec.bits_per_sample, 8 | 16 | 24) {
            return Err(CarrierError::UnsupportedFormat(format!(
                "only 8/16/24-bit PCM WAV is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }
        Ok(())
    }

    /// Saves the audio to a WAV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CarrierError> {
        let mut writer =
            WavWriter::create(path, self.spec).map_err(|e| CarrierError::Save(e.to_string()))?;

        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| CarrierError::Save(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| CarrierError::Save(e.to_string()))
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, CarrierError> {
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)
                .map_err(|e| CarrierError::Save(e.to_string()))?;

            for sample in &self.samples {
                writer
                    .write_sample(*sample)
                    .map_err(|e| CarrierError::Save(e.to_string()))?;
            }

            writer
                .finalize()
                .map_err(|e| CarrierError::Save(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [i32] {
        &mut self.samples
    }

    /// Total number of interleaved samples (frames × channels).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Number of sample frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    pub fn channels(&self) -> u16 {
        self.spec.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.spec.bits_per_sample
    }

    /// Inclusive value range of one sample.
    pub fn sample_range(&self) -> (i32, i32) {
        sample_range(self.spec.bits_per_sample)
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.spec.sample_rate as f64
    }
}

/// Signed range for a PCM bit depth.
fn sample_range(bits_per_sample: u16) -> (i32, i32) {
    let half = 1i32 << (bits_per_sample - 1);
    (-half, half - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bits: u16, count: usize) -> AudioCarrier {
        let amplitude = (1i32 << (bits - 2)) as f64;
        let samples = (0..count)
            .map(|i| (f64::sin(i as f64 * 0.05) * amplitude) as i32)
            .collect();
        AudioCarrier::new(1, 8000, bits, samples).unwrap()
    }

    #[test]
    fn test_wav_roundtrip_all_depths() {
        for bits in [8u16, 16, 24] {
            let audio = sine(bits, 500);
            let bytes = audio.to_wav_bytes().unwrap();
            let loaded = AudioCarrier::from_bytes(&bytes).unwrap();

            assert_eq!(loaded, audio, "{bits}-bit");
        }
    }

    #[test]
    fn test_frame_count_and_duration() {
        let audio = AudioCarrier::new(2, 4, 16, vec![0; 16]).unwrap();
        assert_eq!(audio.sample_count(), 16);
        assert_eq!(audio.frame_count(), 8);
        assert!((audio.duration_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_sample_rejected() {
        assert!(AudioCarrier::new(1, 8000, 8, vec![200]).is_err());
        assert!(AudioCarrier::new(1, 8000, 12, vec![0]).is_err());
        assert!(AudioCarrier::new(2, 8000, 16, vec![0; 3]).is_err());
    }
}
