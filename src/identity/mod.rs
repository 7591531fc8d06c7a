//! Identity normalization and hashing
//!
//! - Deduplication fingerprint over normalized record fields
//! - Salted digest and format checks for full identifiers
//! - Per-verification reference ids

pub mod fingerprint;
pub mod identifier;
pub mod reference;

pub use fingerprint::{composite_key, fingerprint};
pub use identifier::{hash_identifier, is_valid_identifier, verhoeff_check};
pub use reference::generate_reference_id;
