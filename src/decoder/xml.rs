//! Legacy XML decoder
//!
//! Printed-letter QR codes carry a single element (`PrintLetterBarcodeData`,
//! `QRData`, ...) whose attributes hold the fields. Both long attribute
//! names and the single-letter aliases are accepted; the first non-blank
//! alias wins.

use crate::decoder::classify::decode_base64;
use crate::error::DecodeError;
use crate::models::record::trailing_four_digits;
use crate::models::{Gender, IdentityRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use tracing::{debug, warn};

const UID: &[&str] = &["uid", "u"];
const NAME: &[&str] = &["name", "n"];
const GENDER: &[&str] = &["gender", "g"];
const DOB: &[&str] = &["dob", "d"];
const YOB: &[&str] = &["yob", "y"];
const CARE_OF: &[&str] = &["co"];
const HOUSE: &[&str] = &["house", "h"];
const STREET: &[&str] = &["street", "s"];
const LANDMARK: &[&str] = &["lm"];
const LOCALITY: &[&str] = &["loc", "l"];
const VILLAGE: &[&str] = &["vtc"];
const DISTRICT: &[&str] = &["dist"];
const SUB_DISTRICT: &[&str] = &["subdist"];
const STATE: &[&str] = &["state", "st"];
const POSTCODE: &[&str] = &["pc"];
const POST_OFFICE: &[&str] = &["po"];
const PHOTO: &[&str] = &["i", "photo"];

/// Parse a legacy XML document into an identity record.
///
/// A sparse attribute set is valid; only a document that is not well formed
/// or has no element at all is an error.
pub fn decode_xml(text: &str) -> Result<IdentityRecord, DecodeError> {
    let attrs = root_attributes(text)?;
    debug!(attributes = attrs.len(), "xml root parsed");

    let get = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .filter_map(|k| attrs.get(*k))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut record = IdentityRecord {
        name: get(NAME),
        date_of_birth: get(DOB),
        gender: get(GENDER).as_deref().and_then(Gender::normalize),
        year_of_birth: get(YOB),
        care_of: get(CARE_OF),
        house: get(HOUSE),
        street: get(STREET),
        landmark: get(LANDMARK),
        locality: get(LOCALITY),
        village: get(VILLAGE),
        district: get(DISTRICT),
        sub_district: get(SUB_DISTRICT),
        state: get(STATE),
        postcode: get(POSTCODE),
        post_office: get(POST_OFFICE),
        // the attribute may hold the full number; keep only the tail
        uid_last_four: get(UID).as_deref().and_then(trailing_four_digits),
        ..Default::default()
    };

    if let Some(photo) = get(PHOTO) {
        record.has_photo = true;
        match decode_base64(&photo) {
            Ok(bytes) => record.photo_bytes = Some(bytes),
            Err(err) => warn!(%err, "photo attribute is not valid base64"),
        }
    }

    Ok(record)
}

/// Attributes of the document's root element, after checking the whole
/// document is well formed.
fn root_attributes(text: &str) -> Result<HashMap<String, String>, DecodeError> {
    let mut reader = Reader::from_str(text);
    let mut root: Option<HashMap<String, String>> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 && root.is_some() {
                    return Err(malformed("multiple root elements"));
                }
                if root.is_none() {
                    root = Some(collect_attributes(&e)?);
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && root.is_some() {
                    return Err(malformed("multiple root elements"));
                }
                if root.is_none() {
                    root = Some(collect_attributes(&e)?);
                }
            }
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("unbalanced end tag"))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(malformed(format!(
                    "at byte {}: {err}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if depth != 0 {
        return Err(malformed("unclosed element"));
    }
    root.ok_or_else(|| malformed("no root element"))
}

fn collect_attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, DecodeError> {
    let mut map = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|err| malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(err.to_string()))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn malformed(reason: impl Into<String>) -> DecodeError {
    DecodeError::MalformedDocument(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PrintLetterBarcodeData uid="123456789012" name="Ravi Kumar" gender="M" yob="1985"
    co="S/O Mohan" house="7" street="MG Road" lm="Opp. Park" loc="Indiranagar"
    vtc="Bengaluru" po="HAL" dist="Bengaluru Urban" subdist="East" state="Karnataka"
    pc="560038" dob="12/05/1985"/>"#;

    #[test]
    fn test_long_form_attributes() {
        let r = decode_xml(LETTER).unwrap();
        assert_eq!(r.name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(r.gender, Some(Gender::Male));
        assert_eq!(r.year_of_birth.as_deref(), Some("1985"));
        assert_eq!(r.date_of_birth.as_deref(), Some("12/05/1985"));
        assert_eq!(r.care_of.as_deref(), Some("S/O Mohan"));
        assert_eq!(r.landmark.as_deref(), Some("Opp. Park"));
        assert_eq!(r.village.as_deref(), Some("Bengaluru"));
        assert_eq!(r.post_office.as_deref(), Some("HAL"));
        assert_eq!(r.sub_district.as_deref(), Some("East"));
        assert_eq!(r.postcode.as_deref(), Some("560038"));
        assert!(!r.has_photo);
    }

    #[test]
    fn test_full_uid_reduced_to_last_four() {
        let r = decode_xml(LETTER).unwrap();
        assert_eq!(r.uid_last_four.as_deref(), Some("9012"));
        let debug = format!("{r:?}");
        assert!(!debug.contains("123456789012"));
    }

    #[test]
    fn test_short_aliases() {
        let r = decode_xml(r#"<QRData u="xxxxxxxx4321" n="Meera" g="F" d="1992-03-04" st="Goa"/>"#)
            .unwrap();
        assert_eq!(r.uid_last_four.as_deref(), Some("4321"));
        assert_eq!(r.name.as_deref(), Some("Meera"));
        assert_eq!(r.gender, Some(Gender::Female));
        assert_eq!(r.date_of_birth.as_deref(), Some("1992-03-04"));
        assert_eq!(r.state.as_deref(), Some("Goa"));
    }

    #[test]
    fn test_long_form_beats_alias() {
        let r = decode_xml(r#"<QRData name="Long" n="Short"/>"#).unwrap();
        assert_eq!(r.name.as_deref(), Some("Long"));
        let r = decode_xml(r#"<QRData name=" " n="Short"/>"#).unwrap();
        assert_eq!(r.name.as_deref(), Some("Short"));
    }

    #[test]
    fn test_sparse_document_is_valid() {
        let r = decode_xml("<QRData></QRData>").unwrap();
        assert_eq!(r, IdentityRecord::default());
    }

    #[test]
    fn test_escaped_values() {
        let r = decode_xml(r#"<QRData co="S/O A &amp; B"/>"#).unwrap();
        assert_eq!(r.care_of.as_deref(), Some("S/O A & B"));
    }

    #[test]
    fn test_photo_decoded() {
        let r = decode_xml(r#"<QRData n="A" i="/9j/ 4AA="/>"#).unwrap();
        assert!(r.has_photo);
        assert_eq!(r.photo_bytes, Some(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]));

        let r = decode_xml(r#"<QRData n="A" photo="***"/>"#).unwrap();
        assert!(r.has_photo);
        assert_eq!(r.photo_bytes, None);
    }

    #[test]
    fn test_malformed_documents() {
        for doc in [
            "<QRData n=\"A\">",
            "<QRData n=\"A\"></Other>",
            "<QRData n=\"A\" n=\"B\"/>",
            "<QRData/><QRData/>",
            "plain text",
            "",
        ] {
            assert!(
                matches!(decode_xml(doc), Err(DecodeError::MalformedDocument(_))),
                "expected malformed: {doc:?}"
            );
        }
    }
}
