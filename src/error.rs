//! Error taxonomy
//!
//! Every failure is recoverable by the caller. Messages never carry identity
//! field values, only the structural reason.

use std::fmt;
use thiserror::Error;

/// Structural failures raised by the payload decoders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The numeric payload is not a decimal integer.
    #[error("invalid numeric encoding: {0}")]
    InvalidEncoding(String),
    /// Decompression succeeded (or fell back) but produced no field tokens.
    #[error("payload contains no field tokens")]
    EmptyPayload,
    /// The XML document is not well formed or has no root element.
    #[error("malformed identity document: {0}")]
    MalformedDocument(String),
    /// Every decompression strategy failed and the strict policy is active.
    #[error("no decompression strategy accepted the payload")]
    DecompressionFailed,
}

/// Full identifier validation failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Input was not exactly 12 decimal digits after whitespace stripping.
    #[error("identifier must be exactly 12 decimal digits")]
    InvalidIdentifierFormat,
}

/// Startup configuration problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required configuration {0} is not set")]
    MissingSalt(&'static str),
    #[error("configuration {0} is set but empty")]
    EmptySalt(&'static str),
}

/// Caller-visible reasons a verification did not produce a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("image unreadable: {0}")]
    ImageUnreadable(String),
    #[error("no QR code found in the image")]
    NoQrFound,
    #[error("unsupported QR payload format")]
    UnsupportedPayloadFormat,
    #[error("invalid numeric encoding: {0}")]
    InvalidEncoding(String),
    #[error("malformed identity document: {0}")]
    MalformedDocument(String),
    #[error("payload contains no field tokens")]
    EmptyPayload,
    #[error("no decompression strategy accepted the payload")]
    DecompressionFailed,
}

impl VerificationError {
    /// Stable snake_case name of the variant, for counters and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            VerificationError::ImageUnreadable(_) => "image_unreadable",
            VerificationError::NoQrFound => "no_qr_found",
            VerificationError::UnsupportedPayloadFormat => "unsupported_payload_format",
            VerificationError::InvalidEncoding(_) => "invalid_encoding",
            VerificationError::MalformedDocument(_) => "malformed_document",
            VerificationError::EmptyPayload => "empty_payload",
            VerificationError::DecompressionFailed => "decompression_failed",
        }
    }
}

impl From<DecodeError> for VerificationError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidEncoding(msg) => VerificationError::InvalidEncoding(msg),
            DecodeError::EmptyPayload => VerificationError::EmptyPayload,
            DecodeError::MalformedDocument(msg) => VerificationError::MalformedDocument(msg),
            DecodeError::DecompressionFailed => VerificationError::DecompressionFailed,
        }
    }
}

/// Stages of the verification pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ReadQr,
    Classify,
    DecodeSecure,
    DecodeXml,
    BestEffortXml,
    Normalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ReadQr => "read_qr",
            Stage::Classify => "classify",
            Stage::DecodeSecure => "decode_secure",
            Stage::DecodeXml => "decode_xml",
            Stage::BestEffortXml => "best_effort_xml",
            Stage::Normalize => "normalize",
        };
        f.write_str(name)
    }
}

/// Terminal failure of the pipeline: the stage that failed and why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{stage} failed: {error}")]
pub struct VerificationFailure {
    pub stage: Stage,
    #[source]
    pub error: VerificationError,
}

impl VerificationFailure {
    pub fn new(stage: Stage, error: impl Into<VerificationError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_map_onto_taxonomy() {
        assert_eq!(
            VerificationError::from(DecodeError::EmptyPayload),
            VerificationError::EmptyPayload
        );
        assert_eq!(
            VerificationError::from(DecodeError::InvalidEncoding("x".into())),
            VerificationError::InvalidEncoding("x".into())
        );
    }

    #[test]
    fn failure_display_names_stage() {
        let failure = VerificationFailure::new(Stage::ReadQr, VerificationError::NoQrFound);
        assert_eq!(failure.to_string(), "read_qr failed: no QR code found in the image");
    }
}
