//! aadhaar_qr - identity-document QR decoding
//!
//! Turns a photographed identity QR code into a normalized
//! [`IdentityRecord`] and derives a deduplication [`Fingerprint`] that can
//! flag the same person across accounts without storing the identifier.
//!
//! Three wire formats are handled: plain XML, base64 of zlib-compressed XML,
//! and the numeric "secure" format (a big decimal integer wrapping a
//! compressed, 0xFF-delimited field list whose layout is recovered by
//! anchoring on the gender field).
//!
//! `verified` in a [`Verification`] means the fields were decoded. The
//! issuer's digital signature is never checked.

/// Environment-driven configuration
pub mod config;
/// Payload classification and the secure/XML decoders
pub mod decoder;
/// Error taxonomy
pub mod error;
/// Fingerprints, identifier hashing and reference ids
pub mod identity;
/// Core data structures (payloads, records, digests)
pub mod models;
/// Verification pipeline
pub mod pipeline;
/// QR symbol location over decoded images
pub mod reader;
/// Image loading and dataset helpers for the CLI and benches
pub mod tools;
/// Utility functions (grayscale)
pub mod utils;

pub use config::{IdentifierSalt, VerifierOptions};
pub use decoder::DecompressionPolicy;
pub use error::{
    ConfigError, DecodeError, FormatError, Stage, VerificationError, VerificationFailure,
};
pub use models::{
    ClassifiedPayload, Fingerprint, Gender, IdentifierHash, IdentityRecord, PayloadKind, RawPayload,
};
pub use pipeline::{SignatureStatus, Verification, Verifier};
pub use reader::{QrLocator, RqrrLocator, SampleBuffer};

/// Decode the identity QR shown in `image_bytes` with default options.
///
/// # Example
/// ```
/// let err = aadhaar_qr::verify_identity_qr(b"not an image").unwrap_err();
/// assert_eq!(err.stage, aadhaar_qr::Stage::ReadQr);
/// ```
pub fn verify_identity_qr(image_bytes: &[u8]) -> Result<Verification, VerificationFailure> {
    Verifier::new().verify(image_bytes)
}

/// Deduplication fingerprint of a normalized record.
pub fn compute_fingerprint(record: &IdentityRecord) -> Fingerprint {
    identity::fingerprint(record)
}

/// Salted digest of a full 12-digit identifier supplied out of band.
pub fn hash_full_identifier(
    number: &str,
    salt: &IdentifierSalt,
) -> Result<IdentifierHash, FormatError> {
    identity::hash_identifier(number, salt)
}
