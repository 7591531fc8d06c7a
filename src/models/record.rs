use serde::{Serialize, Serializer};
use std::fmt;

/// Gender as printed on the document.
///
/// Single-letter codes expand to full words; anything unrecognised is kept
/// verbatim so no information is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Transgender,
    Other(String),
}

impl Gender {
    /// Normalize a raw gender value. Returns `None` for blank input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let gender = match raw {
            "" => return None,
            "M" | "Male" => Gender::Male,
            "F" | "Female" => Gender::Female,
            "T" | "Transgender" => Gender::Transgender,
            other => Gender::Other(other.to_string()),
        };
        Some(gender)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Transgender => "Transgender",
            Gender::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Normalized identity record produced by either decoder.
///
/// Never holds a full identity number: `uid_last_four` is at most four
/// digits and `reference_id` is the document's own correlation token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<Gender>,
    pub year_of_birth: Option<String>,
    pub care_of: Option<String>,
    pub house: Option<String>,
    pub street: Option<String>,
    pub landmark: Option<String>,
    pub locality: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub sub_district: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub post_office: Option<String>,
    pub uid_last_four: Option<String>,
    pub reference_id: Option<String>,
    pub has_photo: bool,
    #[serde(skip)]
    pub photo_bytes: Option<Vec<u8>>,
}

impl IdentityRecord {
    /// Trim every text field, drop blanks, and enforce the last-four shape.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.date_of_birth,
            &mut self.year_of_birth,
            &mut self.care_of,
            &mut self.house,
            &mut self.street,
            &mut self.landmark,
            &mut self.locality,
            &mut self.village,
            &mut self.district,
            &mut self.sub_district,
            &mut self.state,
            &mut self.postcode,
            &mut self.post_office,
            &mut self.reference_id,
        ] {
            *field = clean(field.take());
        }
        self.gender = self
            .gender
            .take()
            .and_then(|g| Gender::normalize(g.as_str()));
        self.uid_last_four = self.uid_last_four.as_deref().and_then(trailing_four_digits);
        self.has_photo = self.has_photo || self.photo_bytes.is_some();
        self
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// The last four characters of `value` when they are all ASCII digits.
pub fn trailing_four_digits(value: &str) -> Option<String> {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    let tail = &bytes[bytes.len() - 4..];
    if tail.iter().all(u8::is_ascii_digit) {
        Some(value[value.len() - 4..].to_string())
    } else {
        None
    }
}
