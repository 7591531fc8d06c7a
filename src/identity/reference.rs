use rand::RngCore;
use rand::rngs::OsRng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder used when the last four digits are unknown.
pub const UNKNOWN_UID: &str = "XXXX";

const ENTROPY_BYTES: usize = 4;

/// Build a correlation id: `PREFIX-UID4-<base36 millis>-<8 hex>`, upper-cased.
///
/// Unique with high probability; not a secret and not a credential.
pub fn generate_reference_id(prefix: &str, uid_last_four: Option<&str>) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut entropy = [0u8; ENTROPY_BYTES];
    OsRng.fill_bytes(&mut entropy);

    let uid = uid_last_four
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(UNKNOWN_UID);
    format!("{prefix}-{uid}-{}-{}", to_base36(millis), hex::encode(entropy)).to_uppercase()
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
