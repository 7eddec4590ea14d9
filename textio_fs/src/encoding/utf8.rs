/// Check whether a sample is UTF-8.
///
/// A sequence cut off by the end of the sample still counts as valid, since
/// samples are taken at arbitrary byte offsets.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        Err(err) => err.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_and_invalid() {
        assert!(is_valid_utf8("caf\u{e9}".as_bytes()));
        assert!(!is_valid_utf8(b"caf\xe9 au lait"));
    }

    #[test]
    fn test_truncated_tail_is_valid() {
        let bytes = "\u{4e16}".as_bytes();
        assert!(is_valid_utf8(&bytes[..2]));
    }
}
