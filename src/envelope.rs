//! Self-describing framing for embedded payloads.
//!
//! Wire form (MSB-first bits, big-endian integers):
//!
//! ```text
//! magic "STGN" (4) | version (1) | flags (1) | [salt (16) | nonce (12)] | length (4) | body
//! ```
//!
//! Flag bit 0 marks an encrypted body; salt and nonce are present only then.
//! The length prefix tells the decoder exactly how many body bytes follow, so
//! no terminator scanning is ever needed.

use crate::bits::{bytes_to_bits, BitReader, BitSource};
use crate::crypto::{Sealed, NONCE_SIZE, SALT_SIZE};
use crate::error::{Result, StegoError};

/// Magic bytes opening every envelope.
pub const MAGIC: [u8; 4] = *b"STGN";

/// Envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

const FLAG_ENCRYPTED: u8 = 0b0000_0001;

/// Header size in bytes for a plaintext envelope (magic + version + flags + length).
pub const PLAIN_HEADER_SIZE: usize = MAGIC.len() + 1 + 1 + 4;

/// Header size in bytes for an encrypted envelope.
pub const ENCRYPTED_HEADER_SIZE: usize = PLAIN_HEADER_SIZE + SALT_SIZE + NONCE_SIZE;

/// Returns the header size for an envelope with the given encryption flag.
pub fn header_size(encrypted: bool) -> usize {
    if encrypted {
        ENCRYPTED_HEADER_SIZE
    } else {
        PLAIN_HEADER_SIZE
    }
}

/// Key material carried alongside an encrypted body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherHeader {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
}

/// Envelope body as seen by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Plain(Vec<u8>),
    Sealed(Sealed),
}

/// A framed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Present when the body is ciphertext.
    pub cipher: Option<CipherHeader>,
    pub body: Vec<u8>,
}

impl Envelope {
    /// Wraps a plaintext body.
    pub fn plain(body: Vec<u8>) -> Self {
        Self { cipher: None, body }
    }

    /// Wraps the output of [`crate::crypto::encrypt`].
    pub fn sealed(sealed: Sealed) -> Self {
        Self {
            cipher: Some(CipherHeader {
                salt: sealed.salt,
                nonce: sealed.nonce,
            }),
            body: sealed.ciphertext,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Splits the envelope into its body, paired with key material when encrypted.
    pub fn into_body(self) -> Body {
        match self.cipher {
            Some(cipher) => Body::Sealed(Sealed {
                salt: cipher.salt,
                nonce: cipher.nonce,
                ciphertext: self.body,
            }),
            None => Body::Plain(self.body),
        }
    }

    /// Total framed size in bits.
    pub fn encoded_bits(&self) -> usize {
        (header_size(self.is_encrypted()) + self.body.len()) * 8
    }

    /// Serializes the envelope to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let length = u32::try_from(self.body.len()).map_err(|_| {
            StegoError::UnsupportedParameter(format!(
                "payload of {} bytes exceeds the 4 GiB envelope limit",
                self.body.len()
            ))
        })?;

        let mut out = Vec::with_capacity(header_size(self.is_encrypted()) + self.body.len());
        out.extend_from_slice(&MAGIC);
        out.push(ENVELOPE_VERSION);
        match &self.cipher {
            Some(cipher) => {
                out.push(FLAG_ENCRYPTED);
                out.extend_from_slice(&cipher.salt);
                out.extend_from_slice(&cipher.nonce);
            }
            None => out.push(0),
        }
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&self.body);
        Ok(out)
    }

    /// Serializes the envelope to its bitstream.
    pub fn to_bits(&self) -> Result<Vec<u8>> {
        Ok(bytes_to_bits(&self.to_bytes()?))
    }

    /// Parses an envelope from a lazily extracted bitstream.
    pub fn read_from<S: BitSource>(source: &mut S) -> Result<Self> {
        let mut reader = BitReader::new(source);

        let magic: [u8; 4] = reader.read_array()?;
        if magic != MAGIC {
            return Err(StegoError::Format("magic bytes not found".to_string()));
        }

        let version = reader.read_u8()?;
        if version != ENVELOPE_VERSION {
            return Err(StegoError::Format(format!(
                "unsupported envelope version {}",
                version
            )));
        }

        let flags = reader.read_u8()?;
        if flags & !FLAG_ENCRYPTED != 0 {
            return Err(StegoError::Format(format!("reserved flag bits set: {:#04x}", flags)));
        }

        let cipher = if flags & FLAG_ENCRYPTED != 0 {
            Some(CipherHeader {
                salt: reader.read_array()?,
                nonce: reader.read_array()?,
            })
        } else {
            None
        };

        let length = reader.read_u32()? as usize;
        let remaining = reader.remaining();
        if length.saturating_mul(8) > remaining {
            return Err(StegoError::TruncatedData {
                needed: reader.position() + length.saturating_mul(8),
                available: reader.position() + remaining,
            });
        }

        let body = reader.read_bytes(length)?;
        Ok(Self { cipher, body })
    }
}
