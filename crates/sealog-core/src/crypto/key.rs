//! Key derivation using Argon2id.
//!
//! The passphrase is stretched once at startup into a 16-byte AES-128 key.
//! The key is passed by reference to whatever needs it; nothing holds it in
//! global state.

use argon2::Argon2;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, SealogError};

/// Argon2id parameters.
///
/// - Memory: 64 MiB (64 * 1024 KiB)
/// - Iterations: 1 (RFC 9106 first recommended option)
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (16 bytes = AES-128).
pub const KEY_LENGTH: usize = 16;

/// Length of the derivation salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Fixed derivation salt.
///
/// Known weakness: every sealog file shares this salt, so identical
/// passphrases yield identical keys across files. Fixing it means generating
/// a random salt per file and persisting it next to the records, which
/// changes the on-disk format.
pub const DEFAULT_SALT: [u8; SALT_LENGTH] = [0u8; SALT_LENGTH];

/// A cryptographic key derived from a passphrase.
///
/// Key bytes are zeroized when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Build a key from raw bytes held elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `SealogError::KeyLength` unless `bytes` is exactly
    /// [`KEY_LENGTH`] long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LENGTH] = bytes.try_into().map_err(|_| SealogError::KeyLength {
            expected: KEY_LENGTH,
            got: bytes.len(),
        })?;
        Ok(Self::from_bytes(key))
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a passphrase using Argon2id.
///
/// Same passphrase and salt always produce the same key. Callers validate the
/// passphrase beforehand (see [`validate_passphrase`](super::validate_passphrase));
/// this function accepts any bytes.
///
/// # Errors
///
/// Returns `SealogError::Crypto` only if Argon2 rejects its parameters.
///
/// # Examples
///
/// ```
/// use sealog_core::crypto::{derive_key, DEFAULT_SALT};
///
/// let key = derive_key(b"my-passphrase", &DEFAULT_SALT).unwrap();
/// assert_eq!(key.as_bytes().len(), 16);
/// ```
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LENGTH]) -> Result<DerivedKey> {
    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| SealogError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase, salt, &mut key_bytes)
        .map_err(|e| SealogError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}
