use serde::Serialize;
use std::borrow::Cow;

/// Bytes decoded from a QR symbol, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload(Vec<u8>);

impl RawPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload as text; invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RawPayload {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<String> for RawPayload {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

/// Wire format of a QR payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// Plain XML document (legacy printed-letter QR)
    Xml,
    /// Big decimal integer wrapping a compressed, 0xFF-delimited field list
    NumericSecure,
    /// Base64 text of a zlib-compressed XML document
    DeflatedXml,
    /// None of the above
    Unknown,
}

/// A classified payload with the content the next stage consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPayload {
    pub kind: PayloadKind,
    /// XML text for `Xml`/`DeflatedXml`, the trimmed digit string for
    /// `NumericSecure`, the unchanged text for `Unknown`.
    pub content: String,
}
