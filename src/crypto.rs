//! Passphrase-based authenticated encryption for payloads.
//!
//! This module provides:
//! - Argon2id for key derivation from a passphrase (fresh random salt per call)
//! - AES-256-GCM for authenticated encryption
//!
//! A wrong passphrase fails the GCM tag check, so decryption never hands back
//! garbage as if it were the payload.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// Argon2id memory cost in KiB.
pub const KDF_MEMORY_KIB: u32 = 19_456;

/// Argon2id iteration count.
pub const KDF_ITERATIONS: u32 = 2;

/// Argon2id lane count.
pub const KDF_PARALLELISM: u32 = 1;

/// Salt size for key derivation.
pub const SALT_SIZE: usize = 16;

/// Nonce size for AES-256-GCM.
pub const NONCE_SIZE: usize = 12;

/// Authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Minimum passphrase length accepted for encryption.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Maximum passphrase length accepted for encryption.
pub const MAX_PASSPHRASE_LEN: usize = 1000;

/// Errors that can occur during payload encryption.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("wrong passphrase or corrupted data")]
    DecryptionFailed,

    #[error("Invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Weak passphrase: {0}")]
    WeakPassphrase(String),
}

/// Ciphertext together with the values needed to decrypt it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the GCM tag appended.
    pub ciphertext: Vec<u8>,
}

/// Checks a passphrase against the length rules used for encryption.
pub fn validate_passphrase(passphrase: &str) -> Result<(), CryptoError> {
    let len = passphrase.chars().count();
    if len < MIN_PASSPHRASE_LEN {
        return Err(CryptoError::WeakPassphrase(format!(
            "minimum length is {} characters, got {}",
            MIN_PASSPHRASE_LEN, len
        )));
    }
    if len > MAX_PASSPHRASE_LEN {
        return Err(CryptoError::WeakPassphrase(format!(
            "maximum length is {} characters, got {}",
            MAX_PASSPHRASE_LEN, len
        )));
    }
    Ok(())
}

/// Derives a 256-bit key from a passphrase and salt with Argon2id.
fn derive_key(passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_ITERATIONS, KDF_PARALLELISM, Some(32))
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
    Ok(key)
}

/// Encrypts data using a passphrase.
///
/// A fresh salt and nonce are generated for every call, so encrypting the
/// same plaintext twice yields different output.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Sealed, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&*key)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(Sealed {
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypts data sealed by [`encrypt`].
pub fn decrypt(sealed: &Sealed, passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    if sealed.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::CiphertextTooShort);
    }

    let key = derive_key(passphrase, &sealed.salt)?;
    let cipher =
        Aes256Gcm::new_from_slice(&*key).map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"Hello, steganography!";
        let passphrase = "correct horse battery";

        let sealed = encrypt(plaintext, passphrase).unwrap();
        assert_eq!(sealed.ciphertext.len(), plaintext.len() + TAG_SIZE);

        let decrypted = decrypt(&sealed, passphrase).unwrap();
        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let sealed = encrypt(b"Secret data", "correct passphrase").unwrap();
        let result = decrypt(&sealed, "wrong passphrase");

        assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_fresh_salt_and_nonce() {
        let a = encrypt(b"same", "passphrase123").unwrap();
        let b = encrypt(b"same", "passphrase123").unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut sealed = encrypt(b"integrity", "passphrase123").unwrap();
        sealed.ciphertext[0] ^= 0x01;

        assert!(matches!(
            decrypt(&sealed, "passphrase123"),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_ciphertext_too_short() {
        let sealed = Sealed {
            salt: [0u8; SALT_SIZE],
            nonce: [0u8; NONCE_SIZE],
            ciphertext: vec![0u8; 10],
        };

        assert!(matches!(
            decrypt(&sealed, "passphrase123"),
            Err(CryptoError::CiphertextTooShort)
        ));
    }

    #[test]
    fn test_passphrase_rules() {
        assert!(validate_passphrase("short").is_err());
        assert!(validate_passphrase("long enough").is_ok());
        assert!(validate_passphrase(&"x".repeat(1001)).is_err());
    }
}
