//! Effective settings: command line over environment over config file over
//! built-in defaults.

use std::ffi::OsStr;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretSlice};
use tracing::warn;

use sealog_core::crypto::{derive_key, validate_passphrase, LineCipher, DEFAULT_SALT};
use sealog_core::storage::{clamp_buffer_size, DEFAULT_BUFFER_SIZE};
use sealog_core::throttle::{clamp_limit, DEFAULT_EVENTS_PER_SECOND, MAX_EVENTS_PER_SECOND};
use sealog_core::{RecordCodec, SealogError};

use crate::cli::Cli;
use crate::config::SealogConfig;

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub struct Settings {
    pub file_path: PathBuf,
    pub buffer_size: usize,
    pub flow_speed: u32,
    pub passphrase: Option<SecretSlice<u8>>,
}

/// Log filter to install, resolved before anything else logs.
pub fn log_level(cli: &Cli, config: &SealogConfig) -> String {
    cli.log_level
        .clone()
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &SealogConfig) -> anyhow::Result<Self> {
        let file_path = cli
            .file_path
            .clone()
            .or_else(|| config.output.path.as_ref().map(PathBuf::from))
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| {
                SealogError::InvalidInput(
                    "No output path provided. Use --file-path or set [output] path.".to_string(),
                )
            })?;

        let requested_buffer = cli
            .buffer_size
            .or(config.output.buffer_size)
            .unwrap_or(DEFAULT_BUFFER_SIZE);
        let buffer_size = clamp_buffer_size(requested_buffer)?;
        if buffer_size != requested_buffer {
            warn!(
                requested = requested_buffer,
                used = buffer_size,
                "Buffer size above maximum, clamped"
            );
        }

        let requested_speed = cli
            .flow_speed
            .or(config.throttle.events_per_second)
            .unwrap_or(DEFAULT_EVENTS_PER_SECOND);
        if requested_speed == 0 {
            return Err(SealogError::InvalidInput(
                "Flow speed must be greater than zero".to_string(),
            )
            .into());
        }
        let flow_speed = clamp_limit(requested_speed);
        if requested_speed > MAX_EVENTS_PER_SECOND {
            warn!(
                requested = requested_speed,
                used = flow_speed,
                "Flow speed above maximum, clamped"
            );
        }

        // An empty passphrase means encryption is off, as if none was given.
        let passphrase = match cli.log_key.as_deref().map(OsStr::as_encoded_bytes) {
            None | Some([]) => None,
            Some(bytes) => {
                validate_passphrase(bytes)?;
                Some(SecretSlice::from(bytes.to_vec()))
            }
        };

        Ok(Self {
            file_path,
            buffer_size,
            flow_speed,
            passphrase,
        })
    }

    /// Derive the key (if encryption is on) and build the record codec.
    pub fn codec(&self) -> anyhow::Result<RecordCodec> {
        let cipher = match self.passphrase.as_ref() {
            Some(passphrase) => {
                tracing::debug!("Deriving encryption key");
                let key = derive_key(passphrase.expose_secret(), &DEFAULT_SALT)?;
                Some(LineCipher::new(&key)?)
            }
            None => None,
        };
        Ok(RecordCodec::from_cipher(cipher))
    }
}
