use crate::models::{Fingerprint, IdentityRecord};
use sha2::{Digest, Sha256};

/// Composite key the fingerprint is computed over:
/// `name|dob|gender|uid_last_four|postcode`.
///
/// Name, gender, uid and postcode are trimmed and lower-cased; the date of
/// birth is only trimmed. Absent fields contribute an empty string.
pub fn composite_key(record: &IdentityRecord) -> String {
    let folded = |v: Option<&str>| v.unwrap_or("").trim().to_lowercase();
    let name = folded(record.name.as_deref());
    let dob = record.date_of_birth.as_deref().unwrap_or("").trim();
    let gender = folded(record.gender.as_ref().map(|g| g.as_str()));
    let uid = folded(record.uid_last_four.as_deref());
    let postcode = folded(record.postcode.as_deref());
    format!("{name}|{dob}|{gender}|{uid}|{postcode}")
}

/// SHA-256 of the composite key, hex encoded.
pub fn fingerprint(record: &IdentityRecord) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(composite_key(record).as_bytes());
    Fingerprint::from_hex(hex::encode(hasher.finalize()))
}
