//! Secure (numeric-encoded) QR decoder
//!
//! Pipeline: decimal string -> big-endian bytes -> decompression cascade ->
//! 0xFF-delimited tokens -> positional field layout anchored on gender.

pub mod bigint;
pub mod inflate;
pub mod layout;
pub mod tokens;

use crate::error::DecodeError;
use crate::models::IdentityRecord;
use crate::models::record::trailing_four_digits;
use inflate::DecompressionPolicy;
use tracing::{debug, warn};

/// Decode a numeric secure-QR payload into an identity record.
///
/// Only structural failures are errors: non-decimal input and a payload that
/// yields no tokens. Missing fields are left as `None`.
pub fn decode_secure(
    numeric: &str,
    policy: DecompressionPolicy,
) -> Result<IdentityRecord, DecodeError> {
    let bytes = bigint::decimal_to_bytes(numeric.trim())?;
    let body = inflate::decompress(&bytes, policy)?;
    let tokens = tokens::tokenize(&body.bytes);
    if tokens.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }
    debug!(tokens = tokens.len(), strategy = ?body.strategy, "secure payload tokenized");

    Ok(record_from_tokens(&tokens))
}

/// Map an ordered token sequence onto the record fields.
pub fn record_from_tokens(tokens: &[String]) -> IdentityRecord {
    let anchor = layout::locate_anchor(tokens);
    if !anchor.anchored() {
        warn!(
            tokens = tokens.len(),
            name_index = anchor.name_index,
            "gender anchor unusable, using default field positions"
        );
    }

    let mut record = IdentityRecord::default();
    layout::apply_layout(tokens, anchor.name_index, &mut record);

    // a format-constrained match beats a positional guess
    if let Some(pin) = tokens.iter().find(|t| is_postcode(t)) {
        record.postcode = Some(pin.clone());
    }

    let reference = tokens.get(1).or_else(|| tokens.first());
    record.uid_last_four = reference.and_then(|r| trailing_four_digits(r));
    record.reference_id = reference.cloned();
    record
}

fn is_postcode(token: &str) -> bool {
    token.len() == 6 && token.bytes().all(|b| b.is_ascii_digit())
}
