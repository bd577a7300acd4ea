//! Bit-level helpers shared by the envelope and every codec.
//!
//! All bit sequences are MSB-first within each byte and stored one bit per
//! `u8` (values 0 or 1).

use crate::error::{Result, StegoError};

/// Expands bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Packs bits back into bytes. A trailing partial byte is dropped.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}

/// A source of extracted bits that can be asked for more on demand.
///
/// The envelope pulls the fixed header first, learns the body length, and
/// only then pulls the rest.
pub trait BitSource {
    /// Returns the first `count` bits of the carrier's bitstream, or fewer if
    /// the carrier cannot supply that many.
    fn pull(&mut self, count: usize) -> Vec<u8>;

    /// Total number of bits the carrier can supply.
    fn available(&self) -> usize;
}

/// Sequential reader over a [`BitSource`].
pub struct BitReader<'a, S: BitSource> {
    source: &'a mut S,
    buffer: Vec<u8>,
    position: usize,
}

impl<'a, S: BitSource> BitReader<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            position: 0,
        }
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bits the carrier can still supply after the current position.
    pub fn remaining(&self) -> usize {
        self.source.available().saturating_sub(self.position)
    }

    fn ensure(&mut self, count: usize) -> Result<()> {
        let needed = self.position + count;
        if needed > self.source.available() {
            return Err(StegoError::TruncatedData {
                needed,
                available: self.source.available(),
            });
        }
        if needed > self.buffer.len() {
            self.buffer = self.source.pull(needed);
        }
        if needed > self.buffer.len() {
            return Err(StegoError::TruncatedData {
                needed,
                available: self.buffer.len(),
            });
        }
        Ok(())
    }

    /// Reads `count` whole bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let bit_count = count.checked_mul(8).ok_or(StegoError::TruncatedData {
            needed: usize::MAX,
            available: self.source.available(),
        })?;
        self.ensure(bit_count)?;
        let bytes = bits_to_bytes(&self.buffer[self.position..self.position + bit_count]);
        self.position += bit_count;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }
}

/// An in-memory [`BitSource`], mostly useful for tests and for codecs that
/// already hold the full bitstream.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bits: Vec<u8>,
}

impl MemorySource {
    pub fn new(bits: Vec<u8>) -> Self {
        Self { bits }
    }
}

impl BitSource for MemorySource {
    fn pull(&mut self, count: usize) -> Vec<u8> {
        self.bits[..count.min(self.bits.len())].to_vec()
    }

    fn available(&self) -> usize {
        self.bits.len()
    }
}
