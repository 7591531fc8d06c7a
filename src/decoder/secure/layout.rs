//! Positional field layout of the secure format.
//!
//! The format carries no field names. The gender token is the one value
//! recognisable on sight, so it anchors the layout: the name sits two
//! slots before it and every other field follows at a fixed offset from
//! the name. The table below is the whole schema.

use crate::models::{Gender, IdentityRecord};

/// A field recoverable from the token sequence by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    DateOfBirth,
    Gender,
    CareOf,
    District,
    Landmark,
    House,
    Locality,
    Postcode,
    PostOffice,
    State,
    Street,
    SubDistrict,
    Village,
}

/// Offset from the name index to each field.
pub const FIELD_LAYOUT: [(usize, Field); 14] = [
    (0, Field::Name),
    (1, Field::DateOfBirth),
    (2, Field::Gender),
    (3, Field::CareOf),
    (4, Field::District),
    (5, Field::Landmark),
    (6, Field::House),
    (7, Field::Locality),
    (8, Field::Postcode),
    (9, Field::PostOffice),
    (10, Field::State),
    (11, Field::Street),
    (12, Field::SubDistrict),
    (13, Field::Village),
];

/// Tokens accepted as the gender anchor, matched exactly.
pub const GENDER_MARKERS: [&str; 5] = ["M", "F", "Male", "Female", "Transgender"];

/// Name index used when no usable gender anchor exists.
pub const DEFAULT_NAME_INDEX: usize = 3;

/// Where the name field starts, and whether it came from an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub name_index: usize,
    pub gender_index: Option<usize>,
}

impl Anchor {
    /// Whether the layout was anchored on a gender token.
    pub fn anchored(&self) -> bool {
        self.gender_index
            .is_some_and(|g| g >= 2 && g - 2 == self.name_index)
    }
}

/// Find the first gender marker and derive the name index from it.
pub fn locate_anchor(tokens: &[String]) -> Anchor {
    let gender_index = tokens
        .iter()
        .position(|t| GENDER_MARKERS.contains(&t.as_str()));
    let name_index = match gender_index {
        Some(g) if g >= 2 => g - 2,
        _ => DEFAULT_NAME_INDEX,
    };
    Anchor {
        name_index,
        gender_index,
    }
}

/// Copy every positioned token that exists into `record`.
pub fn apply_layout(tokens: &[String], name_index: usize, record: &mut IdentityRecord) {
    for (offset, field) in FIELD_LAYOUT {
        if let Some(value) = tokens.get(name_index + offset) {
            assign(record, field, value);
        }
    }
}

fn assign(record: &mut IdentityRecord, field: Field, value: &str) {
    let text = Some(value.to_string());
    match field {
        Field::Name => record.name = text,
        Field::DateOfBirth => record.date_of_birth = text,
        Field::Gender => record.gender = Gender::normalize(value),
        Field::CareOf => record.care_of = text,
        Field::District => record.district = text,
        Field::Landmark => record.landmark = text,
        Field::House => record.house = text,
        Field::Locality => record.locality = text,
        Field::Postcode => record.postcode = text,
        Field::PostOffice => record.post_office = text,
        Field::State => record.state = text,
        Field::Street => record.street = text,
        Field::SubDistrict => record.sub_district = text,
        Field::Village => record.village = text,
    }
}
