//! Payload classification
//!
//! Check order matters: a digit-only string is also valid base64, so the
//! numeric test must run before the base64 attempt.

use crate::models::{ClassifiedPayload, PayloadKind, RawPayload};
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, alphabet};
use flate2::read::ZlibDecoder;
use std::io::Read;
use tracing::debug;

/// Tag a payload with its wire format and extract what the next stage needs.
pub fn classify(payload: &RawPayload) -> ClassifiedPayload {
    let text = payload.text();

    if text.starts_with('<') {
        return ClassifiedPayload {
            kind: PayloadKind::Xml,
            content: text.into_owned(),
        };
    }

    let trimmed = text.trim();
    if is_decimal(trimmed) {
        return ClassifiedPayload {
            kind: PayloadKind::NumericSecure,
            content: trimmed.to_string(),
        };
    }

    if let Some(xml) = inflate_base64_xml(trimmed) {
        return ClassifiedPayload {
            kind: PayloadKind::DeflatedXml,
            content: xml,
        };
    }

    debug!(bytes = payload.len(), "payload format not recognised");
    ClassifiedPayload {
        kind: PayloadKind::Unknown,
        content: text.into_owned(),
    }
}

/// Standard alphabet; padding optional when decoding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 that may be line-wrapped or unpadded.
pub(crate) fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    LENIENT_BASE64.decode(compact)
}

pub(crate) fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn inflate_base64_xml(text: &str) -> Option<String> {
    let compressed = decode_base64(text).ok()?;
    let mut xml = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut xml)
        .ok()?;
    xml.starts_with('<').then_some(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn deflated_base64(text: &str) -> String {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        STANDARD.encode(enc.finish().unwrap())
    }

    #[test]
    fn test_xml_declaration() {
        let c = classify(&RawPayload::from("<?xml version=\"1.0\"?><QRData n=\"A\"/>"));
        assert_eq!(c.kind, PayloadKind::Xml);
        assert!(c.content.starts_with("<?xml"));
    }

    #[test]
    fn test_digits_are_numeric_even_if_valid_base64() {
        // "12345678" also decodes as base64
        let c = classify(&RawPayload::from("12345678"));
        assert_eq!(c.kind, PayloadKind::NumericSecure);

        let c = classify(&RawPayload::from("  9876543210\n"));
        assert_eq!(c.kind, PayloadKind::NumericSecure);
        assert_eq!(c.content, "9876543210");
    }

    #[test]
    fn test_deflated_xml() {
        let encoded = deflated_base64("<QRData n=\"Jane\"/>");
        let c = classify(&RawPayload::from(encoded.as_str()));
        assert_eq!(c.kind, PayloadKind::DeflatedXml);
        assert_eq!(c.content, "<QRData n=\"Jane\"/>");
    }

    #[test]
    fn test_deflated_xml_line_wrapped() {
        let encoded = deflated_base64("<QRData n=\"Ravi Kumar\" g=\"M\" pc=\"110001\"/>");
        let wrapped = encoded
            .as_bytes()
            .chunks(40)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(wrapped.contains('\n'));

        let c = classify(&RawPayload::from(wrapped));
        assert_eq!(c.kind, PayloadKind::DeflatedXml);
        assert!(c.content.contains("Ravi Kumar"));
    }

    #[test]
    fn test_deflated_xml_unpadded() {
        let mut saw_padding = false;
        for name in ["A", "Ab", "Abc", "Abcd"] {
            let doc = format!("<QRData n=\"{name}\"/>");
            let encoded = deflated_base64(&doc);
            saw_padding |= encoded.ends_with('=');
            let unpadded = encoded.trim_end_matches('=');

            let c = classify(&RawPayload::from(unpadded));
            assert_eq!(c.kind, PayloadKind::DeflatedXml, "{unpadded}");
            assert_eq!(c.content, doc);
        }
        assert!(saw_padding);
    }

    #[test]
    fn test_deflated_non_xml_is_unknown() {
        let encoded = deflated_base64("just text");
        let c = classify(&RawPayload::from(encoded.as_str()));
        assert_eq!(c.kind, PayloadKind::Unknown);
        assert_eq!(c.content, encoded);
    }

    #[test]
    fn test_unknown_passes_through_unchanged() {
        let c = classify(&RawPayload::from("hello world!"));
        assert_eq!(c.kind, PayloadKind::Unknown);
        assert_eq!(c.content, "hello world!");

        let c = classify(&RawPayload::from(""));
        assert_eq!(c.kind, PayloadKind::Unknown);
    }

    #[test]
    fn test_leading_whitespace_before_xml_is_not_xml() {
        let c = classify(&RawPayload::from(" <QRData/>"));
        assert_eq!(c.kind, PayloadKind::Unknown);
    }
}
