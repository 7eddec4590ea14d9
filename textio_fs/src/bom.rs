use crate::encoding::Encoding;

/// A byte-order marker found at the start of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomDetectionResult {
    pub encoding: Encoding,
    pub bom_length: usize,
}

/// Detect a UTF-8, UTF-16 or UTF-32 byte-order marker.
///
/// UTF-32LE is checked before UTF-16LE since its marker starts with the
/// UTF-16LE one.
pub fn detect_bom(bytes: &[u8]) -> Option<BomDetectionResult> {
    let (encoding, bom_length) = match bytes {
        [0xFF, 0xFE, 0x00, 0x00, ..] => (Encoding::Utf32Le, 4),
        [0x00, 0x00, 0xFE, 0xFF, ..] => (Encoding::Utf32Be, 4),
        [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
        [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
        [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
        _ => return None,
    };
    Some(BomDetectionResult { encoding, bom_length })
}

/// Return `bytes` without a leading byte-order marker.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    match detect_bom(bytes) {
        Some(bom) => &bytes[bom.bom_length..],
        None => bytes,
    }
}
