/// Field delimiter in the decompressed secure payload.
pub const SENTINEL: u8 = 0xFF;

/// Split `buf` on [`SENTINEL`], trim each piece, and drop empty pieces.
/// Order is preserved: position is the only structure the format has.
pub fn tokenize(buf: &[u8]) -> Vec<String> {
    buf.split(|&b| b == SENTINEL)
        .filter_map(|piece| {
            let text = String::from_utf8_lossy(piece);
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
