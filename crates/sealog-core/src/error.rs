//! Error types for sealog core operations.
//!
//! Errors fall into two groups. Fatal errors describe a misconfigured or
//! broken process (bad key, unwritable output) and should stop the run.
//! Recoverable errors concern a single record and let the caller move on to
//! the next one. See [`SealogError::is_fatal`].

use thiserror::Error;

/// Result type alias for sealog operations.
pub type Result<T> = std::result::Result<T, SealogError>;

/// Core error type for sealog operations.
#[derive(Debug, Error)]
pub enum SealogError {
    /// Invalid operator input (passphrase too short, zero buffer, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration file could not be used
    #[error("Config error: {0}")]
    Config(String),

    /// Nonce requested below the minimum safe size
    #[error("Nonce must be at least {min} bytes (got {got})")]
    InvalidNonceLength { min: usize, got: usize },

    /// Key material does not match the cipher key size
    #[error("Key must be exactly {expected} bytes (got {got})")]
    KeyLength { expected: usize, got: usize },

    /// Key derivation or cipher setup failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Tag verification failed: tampered record, wrong key, or corruption
    #[error("Record failed authentication")]
    Authentication,

    /// Record could not be decoded (bad base64, non-UTF-8 text, ...)
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The output writer was already flushed and closed
    #[error("Writer is closed")]
    WriterClosed,

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SealogError {
    /// Whether this error should abort the whole run.
    ///
    /// Per-record failures (`Authentication`, `MalformedRecord`) are not
    /// fatal; neither is `WriterClosed`, which only tells the producer that
    /// shutdown already took the writer.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SealogError::Authentication
                | SealogError::MalformedRecord(_)
                | SealogError::WriterClosed
        )
    }
}
