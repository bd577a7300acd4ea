//! # SteganoGen - multi-algorithm steganographic codec
//!
//! Hides an arbitrary byte payload inside an image, WAV audio or video carrier
//! and recovers it byte for byte from the modified carrier.
//!
//! ## Overview
//!
//! - Payloads are framed in a self-describing **envelope** (magic, version,
//!   flags, length prefix), so decode never scans for a terminator
//! - An optional passphrase encrypts the payload with **AES-256-GCM** under an
//!   **Argon2id**-derived key
//! - The **capacity planner** rejects oversized payloads before the carrier is
//!   touched
//! - **LSB** embedding works on image pixels, audio samples and video frames;
//!   **DCT** and **DWT** embedding hide bits in coefficient signs of image blocks
//! - **PSNR/SSIM** are reported for image carriers after encoding
//!
//! ## Example Usage
//!
//! ```rust
//! use steganogen::carrier::{Carrier, ImageCarrier};
//! use steganogen::{decode, encode, EmbeddingParameters};
//!
//! let carrier: Carrier = ImageCarrier::from_raw(64, 64, vec![128; 64 * 64 * 3])
//!     .unwrap()
//!     .into();
//! let params = EmbeddingParameters::lsb(1);
//!
//! let outcome = encode(&carrier, b"hello", &params, None).unwrap();
//! let payload = decode(&outcome.carrier, &params, None).unwrap();
//!
//! assert_eq!(payload, b"hello");
//! ```
//!
//! ## Modules
//!
//! - [`envelope`]: Envelope framing over MSB-first bitstreams
//! - [`crypto`]: Passphrase-based payload encryption
//! - [`capacity`]: Capacity planning
//! - [`lsb`]: Spatial LSB codecs (image, audio, video)
//! - [`transform`]: DCT and DWT codecs (image)
//! - [`metrics`]: PSNR, SSIM and related quality measures
//! - [`analysis`]: Carrier texture statistics and suitability grades
//! - [`carrier`]: Carrier buffers and file helpers

pub mod analysis;
pub mod bits;
pub mod capacity;
pub mod carrier;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod lsb;
pub mod metrics;
pub mod params;
pub mod transform;

pub use capacity::CapacityReport;
pub use carrier::{Carrier, CarrierKind};
pub use codec::{capacity, decode, encode, encode_with_config, Codec, EncodeOutcome};
pub use config::{CodecConfig, Settings};
pub use error::{Result, StegoError};
pub use metrics::QualityReport;
pub use params::{Algorithm, EmbeddingParameters, Preset};
