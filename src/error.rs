//! Error types for the codec engine.
//!
//! [`StegoError`] is what `encode`/`decode` return. The variants are split so a
//! caller can tell a wrong algorithm or parameter set (`Format`) apart from a
//! wrong passphrase (`Decryption`) and from a cropped or non-stego carrier
//! (`TruncatedData`).

use thiserror::Error;

use crate::carrier::CarrierError;
use crate::crypto::CryptoError;

/// Errors that can occur while encoding or decoding a carrier.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Payload too large for carrier: need {needed} bits, usable capacity is {usable} bits")]
    CapacityExceeded { needed: usize, usable: usize },

    #[error("Invalid envelope: {0} (wrong algorithm/parameters or not a stego carrier)")]
    Format(String),

    #[error("Decryption failed: {0}")]
    Decryption(CryptoError),

    #[error("Hidden payload is encrypted: a passphrase is required")]
    PassphraseRequired,

    #[error("Truncated data: need {needed} bits, carrier holds {available}")]
    TruncatedData { needed: usize, available: usize },

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("Encryption failed: {0}")]
    Encryption(CryptoError),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Carrier error: {0}")]
    Carrier(#[from] CarrierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StegoError>;
