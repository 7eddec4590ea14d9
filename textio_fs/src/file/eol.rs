//! Line terminator kinds and line-break normalization.

use std::borrow::Cow;

/// A line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Line Feed (Unix/Linux/macOS) - \n
    Lf,
    /// Carriage Return + Line Feed (Windows) - \r\n
    Crlf,
    /// Carriage Return (old macOS) - \r
    Cr,
}

impl Terminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminator::Lf => "\n",
            Terminator::Crlf => "\r\n",
            Terminator::Cr => "\r",
        }
    }

    /// The terminator `text` ends with, if any.
    pub fn trailing(text: &str) -> Option<Terminator> {
        if text.ends_with("\r\n") {
            Some(Terminator::Crlf)
        } else if text.ends_with('\n') {
            Some(Terminator::Lf)
        } else if text.ends_with('\r') {
            Some(Terminator::Cr)
        } else {
            None
        }
    }
}

/// Rewrite every LF, CR and CR+LF in `text` as `target`.
pub fn normalize_line_breaks(text: &str, target: Terminator) -> Cow<'_, str> {
    let already = match target {
        Terminator::Lf => !text.contains('\r'),
        Terminator::Cr => !text.contains('\n'),
        Terminator::Crlf => is_all_crlf(text),
    };
    if already {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push_str(target.as_str());
            }
            '\n' => result.push_str(target.as_str()),
            other => result.push(other),
        }
    }
    Cow::Owned(result)
}

fn is_all_crlf(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| match b {
        b'\r' => bytes.get(i + 1) == Some(&b'\n'),
        b'\n' => i > 0 && bytes[i - 1] == b'\r',
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_terminator() {
        assert_eq!(Terminator::trailing("a\r\n"), Some(Terminator::Crlf));
        assert_eq!(Terminator::trailing("a\n"), Some(Terminator::Lf));
        assert_eq!(Terminator::trailing("a\r"), Some(Terminator::Cr));
        assert_eq!(Terminator::trailing("a"), None);
        assert_eq!(Terminator::trailing(""), None);
    }

    #[test]
    fn test_normalize_to_lf() {
        let normalized = normalize_line_breaks("line1\r\nline2\rline3\n", Terminator::Lf);
        assert_eq!(normalized, "line1\nline2\nline3\n");
    }

    #[test]
    fn test_normalize_to_crlf() {
        let normalized = normalize_line_breaks("line1\nline2\rline3\r\n", Terminator::Crlf);
        assert_eq!(normalized, "line1\r\nline2\r\nline3\r\n");
    }

    #[test]
    fn test_normalize_borrows_when_unchanged() {
        assert!(matches!(
            normalize_line_breaks("line1\nline2", Terminator::Lf),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            normalize_line_breaks("line1\r\nline2", Terminator::Crlf),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            normalize_line_breaks("a\n\rb", Terminator::Crlf),
            Cow::Owned(_)
        ));
    }
}
