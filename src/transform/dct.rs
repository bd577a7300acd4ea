//! Block DCT embedding.
//!
//! Each 8×8 block of each channel carries one bit in the sign of its
//! mid-frequency coefficient (4, 4), set to `±strength`.

use crate::carrier::ImageCarrier;
use crate::codec::Codec;
use crate::error::Result;

use super::{embed_sign_bits, extract_sign_bits, whole_blocks, BlockTransform};
use crate::carrier::image::CHANNELS;

/// DCT block edge length.
pub const BLOCK_SIZE: usize = 8;

/// Designated coefficient as (row, column) frequency indices.
pub const COEFFICIENT: (usize, usize) = (4, 4);

/// Whole 8×8 blocks per channel.
pub fn block_count(width: usize, height: usize) -> usize {
    whole_blocks(width, height, BLOCK_SIZE)
}

/// Orthonormal 8-point DCT-II basis.
#[derive(Debug, Clone)]
pub struct DctBasis {
    /// `table[k][n] = alpha(k) * cos((2n + 1) k π / 16)`
    table: [[f64; BLOCK_SIZE]; BLOCK_SIZE],
}

impl DctBasis {
    pub fn new() -> Self {
        let n = BLOCK_SIZE as f64;
        let mut table = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for (k, row) in table.iter_mut().enumerate() {
            let alpha = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            for (i, value) in row.iter_mut().enumerate() {
                let angle = (2.0 * i as f64 + 1.0) * k as f64 * std::f64::consts::PI / (2.0 * n);
                *value = alpha * angle.cos();
            }
        }
        Self { table }
    }

    /// Forward 2-D transform of a row-major 8×8 block.
    pub fn forward(&self, block: &[f64]) -> [[f64; BLOCK_SIZE]; BLOCK_SIZE] {
        let mut coefficients = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for (u, out_row) in coefficients.iter_mut().enumerate() {
            for (v, out) in out_row.iter_mut().enumerate() {
                *out = self.project(block, u, v);
            }
        }
        coefficients
    }

    /// Inverse 2-D transform back to a row-major 8×8 block.
    pub fn inverse(&self, coefficients: &[[f64; BLOCK_SIZE]; BLOCK_SIZE]) -> Vec<f64> {
        let mut block = vec![0.0; BLOCK_SIZE * BLOCK_SIZE];
        for y in 0..BLOCK_SIZE {
            for x in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for (u, row) in coefficients.iter().enumerate() {
                    for (v, &c) in row.iter().enumerate() {
                        sum += c * self.table[u][y] * self.table[v][x];
                    }
                }
                block[y * BLOCK_SIZE + x] = sum;
            }
        }
        block
    }

    /// A single coefficient `(u, v)`, where `u` indexes rows and `v` columns.
    pub fn project(&self, block: &[f64], u: usize, v: usize) -> f64 {
        let mut sum = 0.0;
        for y in 0..BLOCK_SIZE {
            let row_weight = self.table[u][y];
            for x in 0..BLOCK_SIZE {
                sum += row_weight * self.table[v][x] * block[y * BLOCK_SIZE + x];
            }
        }
        sum
    }
}

impl Default for DctBasis {
    fn default() -> Self {
        Self::new()
    }
}

/// DCT sign codec for images.
#[derive(Debug, Clone)]
pub struct DctCodec {
    basis: DctBasis,
    strength: f64,
}

impl DctCodec {
    pub fn new(strength: f64) -> Self {
        Self {
            basis: DctBasis::new(),
            strength,
        }
    }
}

impl BlockTransform for DctCodec {
    fn size(&self) -> usize {
        BLOCK_SIZE
    }

    fn coefficient(&self, block: &[f64]) -> f64 {
        self.basis.project(block, COEFFICIENT.0, COEFFICIENT.1)
    }

    fn with_coefficient(&self, block: &[f64], value: f64) -> Vec<f64> {
        let mut coefficients = self.basis.forward(block);
        coefficients[COEFFICIENT.0][COEFFICIENT.1] = value;
        self.basis.inverse(&coefficients)
    }
}

impl Codec<ImageCarrier> for DctCodec {
    fn capacity_bits(&self, carrier: &ImageCarrier) -> usize {
        block_count(carrier.width() as usize, carrier.height() as usize) * CHANNELS
    }

    fn embed(&self, carrier: &mut ImageCarrier, bits: &[u8]) -> Result<()> {
        embed_sign_bits(self, carrier, bits, self.strength)
    }

    fn extract(&self, carrier: &ImageCarrier, limit: usize) -> Vec<u8> {
        extract_sign_bits(self, carrier, limit)
    }
}
