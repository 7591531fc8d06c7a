//! Verification pipeline
//!
//! `ReadQr -> Classify -> {DecodeSecure | DecodeXml | BestEffortXml} ->
//! Normalize`. Each stage either hands its output to the next or ends the
//! run with a [`VerificationFailure`] naming itself; no partial record is
//! ever returned as a success.

use crate::config::VerifierOptions;
use crate::decoder::{classify, decode_secure, decode_xml};
use crate::error::{Stage, VerificationError, VerificationFailure};
use crate::identity::generate_reference_id;
use crate::models::{IdentityRecord, PayloadKind, RawPayload};
use crate::reader::{QrLocator, RqrrLocator, read_payload};
use rayon::prelude::*;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Whether the issuer's signature was checked. This crate never checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    NotChecked,
}

/// Successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// `true` whenever a record was decoded. It means "fields decoded", not
    /// "cryptographically verified"; see [`Verification::signature`].
    pub verified: bool,
    pub signature: SignatureStatus,
    /// Fresh per call; the only field that differs between two runs on the
    /// same image.
    pub reference_id: String,
    pub payload_kind: PayloadKind,
    pub record: IdentityRecord,
    pub decoded_at_ms: u64,
}

/// Reusable verification pipeline. Holds no per-request state, so one
/// instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Verifier<L = RqrrLocator> {
    locator: L,
    options: VerifierOptions,
}

impl Verifier<RqrrLocator> {
    /// Pipeline with the default locator and options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default locator with explicit options.
    pub fn with_options(options: VerifierOptions) -> Self {
        Self {
            locator: RqrrLocator,
            options,
        }
    }
}

impl<L: QrLocator> Verifier<L> {
    /// Pipeline with a custom QR locator.
    pub fn with_locator(locator: L, options: VerifierOptions) -> Self {
        Self { locator, options }
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    /// Run the full pipeline over encoded image bytes.
    pub fn verify(&self, image_bytes: &[u8]) -> Result<Verification, VerificationFailure> {
        let payload = read_payload(image_bytes, &self.locator).map_err(|err| {
            warn!(stage = %Stage::ReadQr, %err, "verification failed");
            VerificationFailure::new(Stage::ReadQr, err)
        })?;
        self.verify_payload(&payload)
    }

    /// Run the pipeline from an already-decoded QR payload.
    pub fn verify_payload(
        &self,
        payload: &RawPayload,
    ) -> Result<Verification, VerificationFailure> {
        let (kind, record) = self.decode_record(payload).inspect_err(|failure| {
            warn!(stage = %failure.stage, err = %failure.error, "verification failed");
        })?;

        let reference_id =
            generate_reference_id(&self.options.reference_prefix, record.uid_last_four.as_deref());
        info!(kind = ?kind, has_photo = record.has_photo, "identity qr decoded");

        Ok(Verification {
            verified: true,
            signature: SignatureStatus::NotChecked,
            reference_id,
            payload_kind: kind,
            record,
            decoded_at_ms: now_millis(),
        })
    }

    /// Decode and normalize the record for `payload` without generating a
    /// reference id. Deterministic for a given payload.
    pub fn decode_record(
        &self,
        payload: &RawPayload,
    ) -> Result<(PayloadKind, IdentityRecord), VerificationFailure> {
        let classified = classify(payload);
        debug!(kind = ?classified.kind, "payload classified");

        let (stage, decoded) = match classified.kind {
            PayloadKind::NumericSecure => (
                Stage::DecodeSecure,
                decode_secure(&classified.content, self.options.decompression)
                    .map_err(VerificationError::from),
            ),
            PayloadKind::Xml | PayloadKind::DeflatedXml => (
                Stage::DecodeXml,
                decode_xml(&classified.content).map_err(VerificationError::from),
            ),
            PayloadKind::Unknown => (
                Stage::BestEffortXml,
                decode_xml(&classified.content)
                    .map_err(|_| VerificationError::UnsupportedPayloadFormat),
            ),
        };
        let record = decoded.map_err(|err| VerificationFailure::new(stage, err))?;

        let record = record.normalized();
        if self.options.reject_empty_records && record == IdentityRecord::default() {
            return Err(VerificationFailure::new(
                Stage::Normalize,
                VerificationError::EmptyPayload,
            ));
        }
        Ok((classified.kind, record))
    }
}

impl<L: QrLocator + Sync> Verifier<L> {
    /// Verify many images in parallel; results keep input order.
    pub fn verify_batch(&self, images: &[&[u8]]) -> Vec<Result<Verification, VerificationFailure>> {
        images.par_iter().map(|bytes| self.verify(bytes)).collect()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_payload_decodes() {
        let verifier = Verifier::new();
        let v = verifier
            .verify_payload(&RawPayload::from(r#"<QRData n="Asha" g="F" u="1234"/>"#))
            .unwrap();
        assert!(v.verified);
        assert_eq!(v.signature, SignatureStatus::NotChecked);
        assert_eq!(v.payload_kind, PayloadKind::Xml);
        assert_eq!(v.record.name.as_deref(), Some("Asha"));
        assert!(v.reference_id.starts_with("AADH-1234-"));
    }

    #[test]
    fn test_unknown_payload_is_unsupported() {
        let err = Verifier::new()
            .verify_payload(&RawPayload::from("https://example.com/not-an-id"))
            .unwrap_err();
        assert_eq!(err.stage, Stage::BestEffortXml);
        assert_eq!(err.error, VerificationError::UnsupportedPayloadFormat);
    }

    #[test]
    fn test_malformed_xml_fails_in_xml_stage() {
        let err = Verifier::new()
            .verify_payload(&RawPayload::from("<QRData n=\"A\">"))
            .unwrap_err();
        assert_eq!(err.stage, Stage::DecodeXml);
        assert!(matches!(err.error, VerificationError::MalformedDocument(_)));
    }

    #[test]
    fn test_sparse_xml_is_a_decoded_empty_record() {
        for doc in ["<QRData/>", r#"<QRData foo="bar"/>"#] {
            let v = Verifier::new().verify_payload(&RawPayload::from(doc)).unwrap();
            assert!(v.verified, "{doc}");
            assert_eq!(v.record, IdentityRecord::default(), "{doc}");
            assert!(v.reference_id.starts_with("AADH-XXXX-"));
        }
    }

    #[test]
    fn test_empty_record_rejected_when_opted_in() {
        let verifier = Verifier::with_options(VerifierOptions {
            reject_empty_records: true,
            ..Default::default()
        });
        let err = verifier
            .verify_payload(&RawPayload::from("<QRData/>"))
            .unwrap_err();
        assert_eq!(err.stage, Stage::Normalize);
        assert_eq!(err.error, VerificationError::EmptyPayload);

        let named = verifier.verify_payload(&RawPayload::from(r#"<QRData n="Asha"/>"#));
        assert!(named.is_ok());
    }

    #[test]
    fn test_numeric_garbage_fails_in_secure_stage() {
        let err = Verifier::new()
            .verify_payload(&RawPayload::from("0"))
            .unwrap_err();
        assert_eq!(err.stage, Stage::DecodeSecure);
        assert_eq!(err.error, VerificationError::EmptyPayload);
    }

    #[test]
    fn test_custom_prefix() {
        let verifier = Verifier::with_options(VerifierOptions {
            reference_prefix: "kyc".into(),
            ..Default::default()
        });
        let v = verifier
            .verify_payload(&RawPayload::from(r#"<QRData n="Asha"/>"#))
            .unwrap();
        assert!(v.reference_id.starts_with("KYC-XXXX-"));
    }
}
