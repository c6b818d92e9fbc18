//! # sealog core
//!
//! Core library for sealog - a throttled, optionally encrypted line logger
//! with durable shutdown.
//!
//! Independent of the command-line interface.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and per-line AES-GCM
//! - **record**: line ⇄ on-disk record encoding
//! - **throttle**: fixed-window rate limiter
//! - **storage**: buffered output with flush + fsync + close
//! - **shutdown**: signal-driven final flush
//! - **pipeline**: the ingest loop tying the above together
//! - **replay**: decode an output file back for inspection

pub mod crypto;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod replay;
pub mod shutdown;
pub mod storage;
pub mod throttle;

pub use error::{Result, SealogError};
pub use record::RecordCodec;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
