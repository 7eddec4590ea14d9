use super::Encoding;

/// Detect BOM-less UTF-16 from where the null bytes of ASCII text land.
pub fn detect_utf16_pattern(bytes: &[u8]) -> Option<Encoding> {
    if bytes.len() < 32 {
        return None;
    }

    let mut even_null = 0usize;
    let mut odd_null = 0usize;
    let mut even_ascii = 0usize;
    let mut odd_ascii = 0usize;

    for pair in bytes.chunks_exact(2) {
        match pair[0] {
            0 => even_null += 1,
            32..=126 => even_ascii += 1,
            _ => {}
        }
        match pair[1] {
            0 => odd_null += 1,
            32..=126 => odd_ascii += 1,
            _ => {}
        }
    }

    let half = (bytes.len() / 2) as f64;
    let ratio = |count: usize| count as f64 / half;

    // Little-endian ASCII puts the null in the high (odd) byte.
    if ratio(odd_null) > 0.85 && ratio(even_ascii) > 0.4 {
        return Some(Encoding::Utf16Le);
    }
    if ratio(even_null) > 0.85 && ratio(odd_ascii) > 0.4 {
        return Some(Encoding::Utf16Be);
    }
    None
}

/// Encode text as UTF-16 in the requested byte order.
pub fn encode_utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() * 2);
    for code_unit in text.encode_utf16() {
        if big_endian {
            result.extend_from_slice(&code_unit.to_be_bytes());
        } else {
            result.extend_from_slice(&code_unit.to_le_bytes());
        }
    }
    result
}
