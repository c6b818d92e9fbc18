//! Encoding of input lines into on-disk records.
//!
//! A record is one line of the output file: either the input line verbatim,
//! or the standard base64 encoding of `nonce ‖ ciphertext ‖ tag`. There is no
//! marker telling the two apart; the reader has to know which codec wrote
//! the file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::LineCipher;
use crate::error::{Result, SealogError};

/// How lines are turned into records and back.
#[derive(Debug, Clone)]
pub enum RecordCodec {
    /// Lines are written verbatim.
    Plain,
    /// Lines are encrypted and base64-encoded.
    Sealed(LineCipher),
}

impl RecordCodec {
    /// Pick the codec for an optional cipher.
    pub fn from_cipher(cipher: Option<LineCipher>) -> Self {
        match cipher {
            Some(cipher) => RecordCodec::Sealed(cipher),
            None => RecordCodec::Plain,
        }
    }

    /// Whether records are encrypted.
    pub fn is_sealed(&self) -> bool {
        matches!(self, RecordCodec::Sealed(_))
    }

    /// Turn one input line (without its newline) into a record.
    pub fn encode(&self, line: &[u8]) -> Result<Vec<u8>> {
        match self {
            RecordCodec::Plain => Ok(line.to_vec()),
            RecordCodec::Sealed(cipher) => {
                let blob = cipher.encrypt(line)?;
                Ok(STANDARD.encode(blob).into_bytes())
            }
        }
    }

    /// Recover the plaintext line from a record.
    ///
    /// # Errors
    ///
    /// - `SealogError::MalformedRecord` if a sealed record is not valid base64
    /// - `SealogError::Authentication` if it does not verify under the key
    pub fn decode(&self, record: &[u8]) -> Result<Vec<u8>> {
        match self {
            RecordCodec::Plain => Ok(record.to_vec()),
            RecordCodec::Sealed(cipher) => {
                let blob = STANDARD
                    .decode(record)
                    .map_err(|e| SealogError::MalformedRecord(format!("invalid base64: {}", e)))?;
                cipher.decrypt(&blob)
            }
        }
    }
}
