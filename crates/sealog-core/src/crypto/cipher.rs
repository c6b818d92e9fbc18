//! Per-line AES-128-GCM encryption.
//!
//! Every call to [`LineCipher::encrypt`] draws a fresh 12-byte nonce from the
//! OS random source and returns `nonce ‖ ciphertext ‖ tag`. No associated
//! data is bound, so a sealed line is self-contained and can be decrypted on
//! its own.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};

use super::key::{DerivedKey, KEY_LENGTH};
use crate::error::{Result, SealogError};

/// Nonce length in bytes (96-bit GCM nonce).
pub const NONCE_LENGTH: usize = 12;

/// Authentication tag length in bytes (128-bit).
pub const TAG_LENGTH: usize = 16;

/// Generate `size` random bytes for use as a nonce.
///
/// # Errors
///
/// Returns `SealogError::InvalidNonceLength` if `size` is below
/// [`NONCE_LENGTH`]. That is a programming or configuration error, not a
/// runtime condition. Returns `SealogError::Crypto` if the OS random source
/// fails.
pub fn generate_nonce(size: usize) -> Result<Vec<u8>> {
    if size < NONCE_LENGTH {
        return Err(SealogError::InvalidNonceLength {
            min: NONCE_LENGTH,
            got: size,
        });
    }

    let mut nonce = vec![0u8; size];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| SealogError::Crypto(format!("Failed to generate nonce: {}", e)))?;
    Ok(nonce)
}

/// AEAD cipher bound to one derived key.
///
/// Built once at startup; the key is injected here rather than looked up per
/// call.
#[derive(Clone)]
pub struct LineCipher {
    aead: Aes128Gcm,
}

impl LineCipher {
    /// Build a cipher for `key`.
    ///
    /// # Errors
    ///
    /// Returns `SealogError::KeyLength` if the key does not fit AES-128.
    pub fn new(key: &DerivedKey) -> Result<Self> {
        let aead =
            Aes128Gcm::new_from_slice(key.as_bytes()).map_err(|_| SealogError::KeyLength {
                expected: KEY_LENGTH,
                got: key.as_bytes().len(),
            })?;
        Ok(Self { aead })
    }

    /// Encrypt one line.
    ///
    /// Returns `nonce ‖ ciphertext ‖ tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = generate_nonce(NONCE_LENGTH)?;
        let sealed = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| SealogError::Crypto(format!("Encryption failed: {}", e)))?;

        let mut out = Vec::with_capacity(NONCE_LENGTH + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    /// Verify and decrypt a blob produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns `SealogError::Authentication` when the tag does not verify:
    /// tampering, wrong key, truncation, or a blob too short to hold a nonce
    /// and tag. The error is recoverable; callers inspecting many records
    /// should report it and continue.
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(SealogError::Authentication);
        }

        let (nonce, sealed) = blob.split_at(NONCE_LENGTH);
        self.aead
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| SealogError::Authentication)
    }
}

impl std::fmt::Debug for LineCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineCipher")
            .field("algorithm", &"AES-128-GCM")
            .finish_non_exhaustive()
    }
}

/// Encrypt `plaintext` under `key`.
///
/// # Examples
///
/// ```
/// use sealog_core::crypto::{decrypt, derive_key, encrypt, DEFAULT_SALT};
///
/// let key = derive_key(b"secret", &DEFAULT_SALT).unwrap();
/// let blob = encrypt(b"hello", &key).unwrap();
/// assert_eq!(decrypt(&blob, &key).unwrap(), b"hello");
/// ```
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    LineCipher::new(key)?.encrypt(plaintext)
}

/// Decrypt a `nonce ‖ ciphertext ‖ tag` blob under `key`.
pub fn decrypt(blob: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    LineCipher::new(key)?.decrypt(blob)
}
