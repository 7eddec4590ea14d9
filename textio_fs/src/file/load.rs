//! Whole-file reads that bypass line splitting.

use std::fs;
use std::path::Path;

use crate::bom::strip_bom;
use crate::encoding::Encoding;
use crate::error::{FailureKind, IoError, Result, Role};
use crate::flags::ReadFlags;

/// Read the entire file as raw bytes.
///
/// Only `strip_bom` has an effect: a leading UTF-8/16/32 byte-order marker
/// is removed from the returned buffer.
pub fn load<P: AsRef<Path>>(path: P, flags: &ReadFlags) -> Result<Vec<u8>> {
    let path = path.as_ref();
    flags.validate()?;

    let mut bytes = fs::read(path)
        .map_err(|err| IoError::from_io(Role::Read, FailureKind::Open, path, err))?;
    log::debug!("loaded {} bytes from {}", bytes.len(), path.display());

    if flags.strip_bom {
        let marker = bytes.len() - strip_bom(&bytes).len();
        bytes.drain(..marker);
    }
    Ok(bytes)
}

/// Read and decode the entire file.
///
/// The encoding is sniffed from the content when `encoding` is `None`.
/// With `strip_bom` a leading U+FEFF is removed from the text.
pub fn load_text<P: AsRef<Path>>(
    path: P,
    flags: &ReadFlags,
    encoding: Option<Encoding>,
) -> Result<String> {
    let path = path.as_ref();
    flags.validate()?;
    let bytes = load(path, &ReadFlags::default())?;
    let encoding = encoding.unwrap_or_else(|| Encoding::detect(&bytes));

    let mut text = encoding
        .decode(&bytes)
        .map_err(|err| IoError::from_codec(Role::Read, FailureKind::Decode, path, err))?;
    if flags.strip_bom && text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_keeps_bytes_unless_stripping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        fs::write(&path, b"\xEF\xBB\xBFhi\r\n").unwrap();

        assert_eq!(load(&path, &ReadFlags::default()).unwrap(), b"\xEF\xBB\xBFhi\r\n");
        let strip = ReadFlags {
            strip_bom: true,
            ..ReadFlags::default()
        };
        assert_eq!(load(&path, &strip).unwrap(), b"hi\r\n");
    }

    #[test]
    fn test_load_strips_utf16_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        fs::write(&path, [0xFF, 0xFE, b'a', 0]).unwrap();
        let strip = ReadFlags {
            strip_bom: true,
            ..ReadFlags::default()
        };
        assert_eq!(load(&path, &strip).unwrap(), [b'a', 0]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let err = load(&path, &ReadFlags::default()).unwrap_err();
        assert_eq!(err.role(), Role::Read);
        assert_eq!(err.file(), Some(path.as_path()));
        assert_ne!(err.code(), 0);
    }

    #[test]
    fn test_load_text_detects_and_strips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        fs::write(&path, [0xFE, 0xFF, 0, b'o', 0, b'k']).unwrap();

        let strip = ReadFlags {
            strip_bom: true,
            ..ReadFlags::default()
        };
        assert_eq!(load_text(&path, &strip, None).unwrap(), "ok");
        assert_eq!(
            load_text(&path, &ReadFlags::default(), None).unwrap(),
            "\u{feff}ok"
        );
    }

    #[test]
    fn test_load_text_reports_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, b"ok \xff").unwrap();
        let err = load_text(&path, &ReadFlags::default(), Some(Encoding::Utf8)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
    }
}
