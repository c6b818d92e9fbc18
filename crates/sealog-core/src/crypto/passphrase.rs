//! Passphrase validation.

use crate::error::{Result, SealogError};

/// Minimum passphrase length in bytes.
pub const MIN_PASSPHRASE_LENGTH: usize = 4;

/// Validate that a configured passphrase is long enough to use.
///
/// An absent passphrase disables encryption and never reaches this check.
///
/// # Examples
///
/// ```
/// use sealog_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase(b"secret").is_ok());
/// assert!(validate_passphrase(b"abc").is_err());
/// ```
pub fn validate_passphrase(passphrase: &[u8]) -> Result<()> {
    if passphrase.len() < MIN_PASSPHRASE_LENGTH {
        return Err(SealogError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH,
            passphrase.len()
        )));
    }

    Ok(())
}
