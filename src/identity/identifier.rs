//! Full 12-digit identifier handling.
//!
//! The QR decoders never see a full number. These helpers exist for callers
//! that receive one out of band and must store only a salted digest.

use crate::config::IdentifierSalt;
use crate::error::FormatError;
use crate::models::IdentifierHash;
use sha2::{Digest, Sha256};

const IDENTIFIER_DIGITS: usize = 12;

// Verhoeff dihedral-group tables
const D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

const P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 8, 6, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Strip all whitespace and require exactly 12 ASCII digits.
fn clean(number: &str) -> Result<String, FormatError> {
    let compact: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() == IDENTIFIER_DIGITS && compact.bytes().all(|b| b.is_ascii_digit()) {
        Ok(compact)
    } else {
        Err(FormatError::InvalidIdentifierFormat)
    }
}

/// Whether `number` is 12 decimal digits once whitespace is removed.
pub fn is_valid_identifier(number: &str) -> bool {
    clean(number).is_ok()
}

/// Verhoeff checksum over a well-formed identifier (last digit is the
/// check digit). Malformed input returns `false`.
pub fn verhoeff_check(number: &str) -> bool {
    let Ok(digits) = clean(number) else {
        return false;
    };
    let mut c = 0u8;
    for (i, b) in digits.bytes().rev().enumerate() {
        let d = (b - b'0') as usize;
        c = D[c as usize][P[i % 8][d] as usize];
    }
    c == 0
}

/// SHA-256 over `number ++ salt`, hex encoded.
pub fn hash_identifier(number: &str, salt: &IdentifierSalt) -> Result<IdentifierHash, FormatError> {
    let digits = clean(number)?;
    let mut hasher = Sha256::new();
    hasher.update(digits.as_bytes());
    hasher.update(salt.expose().as_bytes());
    Ok(IdentifierHash::from_hex(hex::encode(hasher.finalize())))
}
