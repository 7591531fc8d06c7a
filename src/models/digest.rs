use serde::Serialize;
use std::fmt;

/// Hex SHA-256 over the normalized `name|dob|gender|uid|postcode` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

/// Hex SHA-256 over a full 12-digit identifier followed by the salt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IdentifierHash(String);

macro_rules! hex_digest {
    ($ty:ident) => {
        impl $ty {
            pub(crate) fn from_hex(hex: String) -> Self {
                Self(hex)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

hex_digest!(Fingerprint);
hex_digest!(IdentifierHash);
