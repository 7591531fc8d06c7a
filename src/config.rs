//! Environment-driven configuration.
//!
//! - `IDQR_HASH_SALT`: salt for full-identifier digests (required, no default)
//! - `IDQR_STRICT_DECOMPRESSION`: `1` to fail instead of tokenizing an
//!   undecompressible buffer (default `0`)
//! - `IDQR_REFERENCE_PREFIX`: prefix for generated reference ids (default `AADH`)
//! - `IDQR_REJECT_EMPTY_RECORDS`: `1` to fail when a payload decodes to a
//!   record with no field set (default `0`)

use crate::decoder::DecompressionPolicy;
use crate::error::ConfigError;
use std::fmt;

pub const SALT_ENV: &str = "IDQR_HASH_SALT";
pub const STRICT_DECOMPRESSION_ENV: &str = "IDQR_STRICT_DECOMPRESSION";
pub const REFERENCE_PREFIX_ENV: &str = "IDQR_REFERENCE_PREFIX";
pub const REJECT_EMPTY_RECORDS_ENV: &str = "IDQR_REJECT_EMPTY_RECORDS";

pub const DEFAULT_REFERENCE_PREFIX: &str = "AADH";

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_env_string(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Secret salt for full-identifier digests. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentifierSalt(String);

impl IdentifierSalt {
    /// Wrap a salt value; blank values are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigError::EmptySalt(SALT_ENV));
        }
        Ok(Self(value))
    }

    /// Read the salt from `IDQR_HASH_SALT`. Call at startup so a missing
    /// salt stops the process before any identifier is hashed.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(SALT_ENV) {
            Ok(value) => Self::new(value),
            Err(_) => Err(ConfigError::MissingSalt(SALT_ENV)),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentifierSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentifierSalt(<redacted>)")
    }
}

/// Non-secret options for the verification pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierOptions {
    pub decompression: DecompressionPolicy,
    pub reference_prefix: String,
    /// Fail at the normalize stage when no field survives normalization.
    /// Off by default: a sparse document is a valid decode.
    pub reject_empty_records: bool,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            decompression: DecompressionPolicy::Lenient,
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            reject_empty_records: false,
        }
    }
}

impl VerifierOptions {
    /// Options from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let decompression = if parse_env_bool_u8(STRICT_DECOMPRESSION_ENV, false) {
            DecompressionPolicy::Strict
        } else {
            DecompressionPolicy::Lenient
        };
        Self {
            decompression,
            reference_prefix: parse_env_string(REFERENCE_PREFIX_ENV, DEFAULT_REFERENCE_PREFIX),
            reject_empty_records: parse_env_bool_u8(REJECT_EMPTY_RECORDS_ENV, false),
        }
    }
}
