/// Conversion between decimal digit strings and big-endian byte strings.
///
/// The secure QR format serializes its compressed body as one unsigned
/// integer. Digits are consumed nine at a time into base-256 limbs, so the
/// cost is quadratic in the payload length with a small constant.
use crate::decoder::classify::is_decimal;
use crate::error::DecodeError;

const CHUNK_DIGITS: usize = 9;
const CHUNK_BASE: u64 = 1_000_000_000;

/// Parse a decimal string into its minimal big-endian byte representation.
///
/// Zero (including any run of zeros) yields an empty buffer; leading zero
/// bytes are never emitted.
pub fn decimal_to_bytes(digits: &str) -> Result<Vec<u8>, DecodeError> {
    if !is_decimal(digits) {
        return Err(DecodeError::InvalidEncoding(
            "expected only decimal digits".into(),
        ));
    }

    // little-endian limbs while accumulating
    let mut limbs: Vec<u8> = Vec::with_capacity(digits.len() / 2 + 1);
    let head = digits.len() % CHUNK_DIGITS;
    let mut start = 0;
    while start < digits.len() {
        let end = if start == 0 && head != 0 {
            head
        } else {
            start + CHUNK_DIGITS
        };
        let chunk = &digits[start..end];
        // chunk is 1..=9 ASCII digits
        let value: u64 = chunk.parse().map_err(|_| {
            DecodeError::InvalidEncoding("digit chunk out of range".into())
        })?;
        let scale = 10u64.pow(chunk.len() as u32);
        mul_add(&mut limbs, scale, value);
        start = end;
    }

    while limbs.last() == Some(&0) {
        limbs.pop();
    }
    limbs.reverse();
    Ok(limbs)
}

fn mul_add(limbs: &mut Vec<u8>, scale: u64, add: u64) {
    let mut carry = add;
    for limb in limbs.iter_mut() {
        let v = *limb as u64 * scale + carry;
        *limb = (v & 0xFF) as u8;
        carry = v >> 8;
    }
    while carry > 0 {
        limbs.push((carry & 0xFF) as u8);
        carry >>= 8;
    }
}

/// Render big-endian bytes as a decimal string. Inverse of
/// [`decimal_to_bytes`] for buffers without leading zero bytes.
pub fn bytes_to_decimal(bytes: &[u8]) -> String {
    let mut value: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    if value.is_empty() {
        return "0".to_string();
    }

    let mut chunks = Vec::new();
    while !value.is_empty() {
        let mut rem = 0u64;
        let mut quotient = Vec::with_capacity(value.len());
        for &b in &value {
            let cur = (rem << 8) | b as u64;
            let q = cur / CHUNK_BASE;
            rem = cur % CHUNK_BASE;
            if !(quotient.is_empty() && q == 0) {
                quotient.push(q as u8);
            }
        }
        chunks.push(rem);
        value = quotient;
    }

    let mut out = String::with_capacity(chunks.len() * CHUNK_DIGITS);
    let mut iter = chunks.iter().rev();
    if let Some(first) = iter.next() {
        out.push_str(&first.to_string());
    }
    for chunk in iter {
        out.push_str(&format!("{chunk:09}"));
    }
    out
}
