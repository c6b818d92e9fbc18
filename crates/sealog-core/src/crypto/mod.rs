//! Cryptographic operations for sealog.
//!
//! - **Argon2id**: memory-hard key derivation from the operator passphrase
//! - **AES-128-GCM**: per-line authenticated encryption
//!
//! ## Security Model
//!
//! - One key per process, derived once at startup
//! - A fresh random nonce for every line
//! - Key material zeroized from memory on drop and never logged
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading log contents from a stolen output file
//! - Undetected tampering with individual records
//!
//! We do NOT defend against:
//! - Dropping, reordering, or duplicating whole records
//! - Precomputed attacks across files (the derivation salt is fixed)
//! - Compromised host / memory access

pub mod cipher;
pub mod key;
pub mod passphrase;

pub use cipher::{decrypt, encrypt, generate_nonce, LineCipher, NONCE_LENGTH, TAG_LENGTH};
pub use key::{derive_key, DerivedKey, DEFAULT_SALT, KEY_LENGTH, SALT_LENGTH};
pub use passphrase::{validate_passphrase, MIN_PASSPHRASE_LENGTH};
