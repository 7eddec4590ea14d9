use super::Encoding;

/// Guess a Latin-family encoding for bytes that are not UTF-8.
///
/// C1 bytes (0x80..=0x9F) are printable only in Windows-1252; the
/// characters ISO-8859-15 moved (euro, S/Z caron, OE) hint at Latin-9.
pub fn detect_latin_encoding(bytes: &[u8]) -> Option<Encoding> {
    if bytes.len() < 10 {
        return None;
    }

    let extended = bytes.iter().filter(|&&b| b >= 0x80).count();
    let c1 = bytes.iter().filter(|b| (0x80..=0x9F).contains(*b)).count();
    let latin9_specific = bytes
        .iter()
        .filter(|&&b| matches!(b, 0xA4 | 0xA6 | 0xA8 | 0xB4 | 0xB8 | 0xBC | 0xBD | 0xBE))
        .count();

    if (extended as f64 / bytes.len() as f64) < 0.08 && c1 == 0 {
        return None;
    }

    let label = if c1 > 0 {
        "windows-1252"
    } else if latin9_specific > extended / 10 {
        "iso-8859-15"
    } else {
        "windows-1252"
    };
    Encoding::from_label(label)
}
