//! Codec adapter: encoding identifiers, streaming decode, whole-unit encode
//! and encoding sniffing.
//!
//! Legacy single- and multi-byte encodings are delegated to `encoding_rs`.
//! UTF-16 output and UTF-32 in both directions are transcoded here since
//! `encoding_rs` only decodes the former and knows nothing of the latter.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod decode;
pub mod latin;
pub mod utf16;
pub mod utf32;
pub mod utf8;

pub use decode::Decoder;
pub use latin::detect_latin_encoding;
pub use utf16::detect_utf16_pattern;
pub use utf8::is_valid_utf8;

use crate::bom::detect_bom;

/// Failures raised by the codec layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed {encoding} input at byte {position}")]
    Malformed { encoding: Encoding, position: u64 },
    #[error("character {ch:?} cannot be encoded in {encoding}")]
    Unmappable { encoding: Encoding, ch: char },
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}

/// A text encoding understood by readers and writers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    /// Any non-Unicode encoding known to `encoding_rs`
    Legacy(&'static encoding_rs::Encoding),
}

/// Windows code page numbers for the legacy encodings.
const CODE_PAGES: &[(u32, &str)] = &[
    (866, "ibm866"),
    (874, "windows-874"),
    (932, "shift_jis"),
    (936, "gbk"),
    (949, "euc-kr"),
    (950, "big5"),
    (1250, "windows-1250"),
    (1251, "windows-1251"),
    (1252, "windows-1252"),
    (1253, "windows-1253"),
    (1254, "windows-1254"),
    (1255, "windows-1255"),
    (1256, "windows-1256"),
    (1257, "windows-1257"),
    (1258, "windows-1258"),
    (10000, "macintosh"),
    (10007, "x-mac-cyrillic"),
    (20866, "koi8-r"),
    (20932, "euc-jp"),
    (21866, "koi8-u"),
    (28591, "iso-8859-1"),
    (28592, "iso-8859-2"),
    (28593, "iso-8859-3"),
    (28594, "iso-8859-4"),
    (28595, "iso-8859-5"),
    (28596, "iso-8859-6"),
    (28597, "iso-8859-7"),
    (28598, "iso-8859-8"),
    (28603, "iso-8859-13"),
    (28605, "iso-8859-15"),
    (38598, "iso-8859-8-i"),
    (50220, "iso-2022-jp"),
    (51932, "euc-jp"),
    (54936, "gb18030"),
];

impl Encoding {
    /// Look up an encoding by name, e.g. `"utf-8"`, `"UTF-16BE"`, `"latin1"`.
    pub fn from_label(label: &str) -> Option<Encoding> {
        let label = label.trim().to_ascii_lowercase();
        let unicode = match label.as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "utf-16" | "utf16" | "utf-16le" | "utf16le" | "ucs-2" => Some(Encoding::Utf16Le),
            "utf-16be" | "utf16be" => Some(Encoding::Utf16Be),
            "utf-32" | "utf32" | "utf-32le" | "utf32le" => Some(Encoding::Utf32Le),
            "utf-32be" | "utf32be" => Some(Encoding::Utf32Be),
            _ => None,
        };
        unicode.or_else(|| {
            encoding_rs::Encoding::for_label(label.as_bytes()).and_then(Encoding::from_rs)
        })
    }

    /// Look up an encoding by Windows code page number.
    pub fn from_code_page(code_page: u32) -> Option<Encoding> {
        match code_page {
            65001 => Some(Encoding::Utf8),
            1200 => Some(Encoding::Utf16Le),
            1201 => Some(Encoding::Utf16Be),
            12000 => Some(Encoding::Utf32Le),
            12001 => Some(Encoding::Utf32Be),
            _ => CODE_PAGES
                .iter()
                .find(|(page, _)| *page == code_page)
                .and_then(|(_, label)| Encoding::from_label(label)),
        }
    }

    fn from_rs(encoding: &'static encoding_rs::Encoding) -> Option<Encoding> {
        if encoding == encoding_rs::UTF_8 {
            Some(Encoding::Utf8)
        } else if encoding == encoding_rs::UTF_16LE {
            Some(Encoding::Utf16Le)
        } else if encoding == encoding_rs::UTF_16BE {
            Some(Encoding::Utf16Be)
        } else if encoding == encoding_rs::REPLACEMENT {
            // Decodes everything to U+FFFD; never what a caller means.
            None
        } else {
            Some(Encoding::Legacy(encoding))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Legacy(encoding) => encoding.name(),
        }
    }

    /// Byte-order marker for this encoding; empty for legacy encodings.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16Le => &[0xFF, 0xFE],
            Encoding::Utf16Be => &[0xFE, 0xFF],
            Encoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Encoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            Encoding::Legacy(_) => &[],
        }
    }

    /// Start a streaming decoder. Byte-order markers are not consumed: a
    /// leading marker decodes to U+FEFF.
    pub fn new_decoder(&self) -> Decoder {
        Decoder::new(*self)
    }

    /// Decode a complete buffer.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, CodecError> {
        let mut text = String::new();
        self.new_decoder().decode(bytes, true, &mut text)?;
        Ok(text)
    }

    /// Encode `text` as one self-contained unit; stateful encodings are
    /// returned to their initial state at the end.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Utf16Le => Ok(utf16::encode_utf16(text, false)),
            Encoding::Utf16Be => Ok(utf16::encode_utf16(text, true)),
            Encoding::Utf32Le => Ok(utf32::encode_utf32(text, false)),
            Encoding::Utf32Be => Ok(utf32::encode_utf32(text, true)),
            Encoding::Legacy(encoding) => encode_legacy(text, *self, *encoding),
        }
    }

    /// Guess the encoding of a leading sample of a file.
    ///
    /// Strategy: byte-order marker, then the UTF-16 null-byte pattern, then
    /// UTF-8 validity, then Latin-family scoring, falling back to UTF-8.
    pub fn detect(sample: &[u8]) -> Encoding {
        if let Some(bom) = detect_bom(sample) {
            return bom.encoding;
        }
        if let Some(encoding) = detect_utf16_pattern(sample) {
            return encoding;
        }
        if is_valid_utf8(sample) {
            return Encoding::Utf8;
        }
        detect_latin_encoding(sample).unwrap_or(Encoding::Utf8)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    /// Accepts a label or a decimal code page number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = match s.trim().parse::<u32>() {
            Ok(code_page) => Encoding::from_code_page(code_page),
            Err(_) => Encoding::from_label(s),
        };
        found.ok_or_else(|| CodecError::UnknownEncoding(s.to_string()))
    }
}

fn encode_legacy(
    text: &str,
    encoding: Encoding,
    rs: &'static encoding_rs::Encoding,
) -> Result<Vec<u8>, CodecError> {
    use encoding_rs::EncoderResult;

    let mut encoder = rs.new_encoder();
    let capacity = encoder
        .max_buffer_length_from_utf8_without_replacement(text.len())
        .unwrap_or(text.len());
    let mut out = Vec::with_capacity(capacity);
    let mut input = text;
    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(input, &mut out, true);
        input = &input[read..];
        match result {
            EncoderResult::InputEmpty => return Ok(out),
            EncoderResult::OutputFull => {
                let more = encoder
                    .max_buffer_length_from_utf8_without_replacement(input.len())
                    .unwrap_or(input.len() + 16);
                out.reserve(more);
            }
            EncoderResult::Unmappable(ch) => return Err(CodecError::Unmappable { encoding, ch }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Encoding::from_label("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_label("utf-16be"), Some(Encoding::Utf16Be));
        assert_eq!(Encoding::from_label("utf-32"), Some(Encoding::Utf32Le));
        assert_eq!(
            Encoding::from_label("latin1"),
            Some(Encoding::Legacy(encoding_rs::WINDOWS_1252))
        );
        assert_eq!(Encoding::from_label("replacement"), None);
        assert_eq!(Encoding::from_label("no-such-thing"), None);
    }

    #[test]
    fn test_code_pages() {
        assert_eq!(Encoding::from_code_page(65001), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_code_page(1201), Some(Encoding::Utf16Be));
        assert_eq!(
            Encoding::from_code_page(932),
            Some(Encoding::Legacy(encoding_rs::SHIFT_JIS))
        );
        assert_eq!(Encoding::from_code_page(1), None);
    }

    #[test]
    fn test_from_str_accepts_numbers_and_names() {
        assert_eq!("1252".parse::<Encoding>().unwrap().name(), "windows-1252");
        assert_eq!("utf-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert!(matches!(
            "klingon".parse::<Encoding>(),
            Err(CodecError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_encode_legacy() {
        let latin1 = Encoding::from_label("latin1").unwrap();
        assert_eq!(latin1.encode("caf\u{e9}").unwrap(), b"caf\xe9");
        assert!(matches!(
            latin1.encode("\u{4e16}"),
            Err(CodecError::Unmappable { ch: '\u{4e16}', .. })
        ));
    }

    #[test]
    fn test_encode_decode_shift_jis() {
        let sjis = Encoding::from_label("shift_jis").unwrap();
        let bytes = sjis.encode("Hello \u{4e16}\u{754c}").unwrap();
        assert_eq!(bytes, [72, 101, 108, 108, 111, 32, 144, 162, 138, 69]);
        assert_eq!(sjis.decode(&bytes).unwrap(), "Hello \u{4e16}\u{754c}");
    }

    #[test]
    fn test_detect() {
        assert_eq!(Encoding::detect(&[0xFE, 0xFF, 0x00, b'a']), Encoding::Utf16Be);
        assert_eq!(Encoding::detect("plain ascii".as_bytes()), Encoding::Utf8);
        assert_eq!(Encoding::detect("d\u{e9}j\u{e0} vu".as_bytes()), Encoding::Utf8);
        assert_eq!(Encoding::detect(&[]), Encoding::Utf8);
    }

    #[test]
    fn test_bom_bytes() {
        assert_eq!(Encoding::Utf8.bom(), &[0xEF, 0xBB, 0xBF]);
        assert!(Encoding::from_label("koi8-r").unwrap().bom().is_empty());
    }
}
