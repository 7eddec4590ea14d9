//! Incremental line splitting over decoded text.
//!
//! Text arrives in arbitrary chunks. The splitter keeps the undelimited tail
//! in one buffer and a scan cursor that only moves forward, so every byte is
//! examined once no matter how lines and chunks interleave.

/// One line as it appeared in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub content: String,
    /// The delimiter that ended the line; empty for a final unterminated line
    pub terminator: String,
}

impl Line {
    pub fn into_string(self) -> String {
        let mut text = self.content;
        text.push_str(&self.terminator);
        text
    }
}

/// Splits decoded text on LF, CR and CR+LF, or on an explicit delimiter.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: String,
    /// Start of the first unconsumed line
    start: usize,
    /// Everything in `start..scan` is known not to begin a terminator
    scan: usize,
    delimiter: Option<String>,
    finished: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split only on `delimiter` instead of the standard line breaks.
    /// An empty delimiter falls back to the standard rule.
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        LineSplitter {
            delimiter: (!delimiter.is_empty()).then_some(delimiter),
            ..Self::default()
        }
    }

    /// Append a decoded chunk.
    pub fn push(&mut self, text: &str) {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.scan -= self.start;
            self.start = 0;
        }
        self.buffer.push_str(text);
    }

    /// Mark the end of the stream; a trailing fragment becomes a line.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// No more lines will ever be produced.
    pub fn is_done(&self) -> bool {
        self.finished && self.start == self.buffer.len()
    }

    /// Next complete line, or `None` when more input is needed (or the
    /// stream is done).
    pub fn next_line(&mut self) -> Option<Line> {
        let found = match self.delimiter.as_ref().map(String::len) {
            Some(len) => self.scan_delimiter(len),
            None => self.scan_line_break(),
        };
        if let Some((end, len)) = found {
            return Some(self.take(end, len));
        }
        if self.finished && self.start < self.buffer.len() {
            let end = self.buffer.len();
            return Some(self.take(end, 0));
        }
        None
    }

    fn scan_line_break(&mut self) -> Option<(usize, usize)> {
        let bytes = self.buffer.as_bytes();
        let offset = bytes[self.scan..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r');
        let Some(offset) = offset else {
            self.scan = bytes.len();
            return None;
        };
        let at = self.scan + offset;
        if bytes[at] == b'\n' {
            return Some((at, 1));
        }
        match bytes.get(at + 1) {
            Some(b'\n') => Some((at, 2)),
            Some(_) => Some((at, 1)),
            None if self.finished => Some((at, 1)),
            None => {
                // Lone CR at the end of the chunk: wait for the next one.
                self.scan = at;
                None
            }
        }
    }

    fn scan_delimiter(&mut self, len: usize) -> Option<(usize, usize)> {
        let delimiter = self.delimiter.as_deref().unwrap_or_default();
        if let Some(offset) = self.buffer[self.scan..].find(delimiter) {
            return Some((self.scan + offset, len));
        }
        // A delimiter prefix may be sitting at the end of the buffer.
        let mut resume = self.buffer.len().saturating_sub(len - 1).max(self.scan);
        while !self.buffer.is_char_boundary(resume) {
            resume -= 1;
        }
        self.scan = resume;
        None
    }

    fn take(&mut self, end: usize, terminator_len: usize) -> Line {
        let next = end + terminator_len;
        let line = Line {
            content: self.buffer[self.start..end].to_string(),
            terminator: self.buffer[end..next].to_string(),
        };
        self.start = next;
        self.scan = next;
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_chunks(chunks: &[&str], splitter: &mut LineSplitter) -> Vec<Line> {
        let mut lines = Vec::new();
        for chunk in chunks {
            splitter.push(chunk);
            while let Some(line) = splitter.next_line() {
                lines.push(line);
            }
        }
        splitter.finish();
        while let Some(line) = splitter.next_line() {
            lines.push(line);
        }
        assert!(splitter.is_done());
        lines
    }

    fn split(chunks: &[&str]) -> Vec<(String, String)> {
        split_chunks(chunks, &mut LineSplitter::new())
            .into_iter()
            .map(|l| (l.content, l.terminator))
            .collect()
    }

    fn pair(content: &str, terminator: &str) -> (String, String) {
        (content.to_string(), terminator.to_string())
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(
            split(&["a\nb\r\nc\rd"]),
            vec![pair("a", "\n"), pair("b", "\r\n"), pair("c", "\r"), pair("d", "")]
        );
    }

    #[test]
    fn test_edge_cases() {
        assert!(split(&[]).is_empty());
        assert!(split(&[""]).is_empty());
        assert_eq!(split(&["\n"]), vec![pair("", "\n")]);
        assert_eq!(split(&["a\nb"]), vec![pair("a", "\n"), pair("b", "")]);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        assert_eq!(split(&["a\r", "\nb"]), vec![pair("a", "\r\n"), pair("b", "")]);
    }

    #[test]
    fn test_lone_cr_at_chunk_end() {
        assert_eq!(split(&["a\r", "b"]), vec![pair("a", "\r"), pair("b", "")]);
        assert_eq!(split(&["a\r"]), vec![pair("a", "\r")]);
        assert_eq!(split(&["a\r", "", "\r"]), vec![pair("a", "\r"), pair("", "\r")]);
    }

    #[test]
    fn test_line_spanning_many_chunks() {
        assert_eq!(
            split(&["he", "ll", "o\u{e9}", "\n", "x"]),
            vec![pair("hello\u{e9}", "\n"), pair("x", "")]
        );
    }

    #[test]
    fn test_explicit_delimiter() {
        let mut splitter = LineSplitter::with_delimiter("::");
        let lines = split_chunks(&["a::b:", ":c\n:d"], &mut splitter);
        let lines: Vec<_> = lines.into_iter().map(|l| (l.content, l.terminator)).collect();
        assert_eq!(
            lines,
            vec![pair("a", "::"), pair("b", "::"), pair("c\n:d", "")]
        );
    }

    #[test]
    fn test_delimiter_after_multibyte_text() {
        let mut splitter = LineSplitter::with_delimiter("\u{2029}");
        let lines = split_chunks(&["\u{e9}\u{e9}", "\u{2029}z"], &mut splitter);
        assert_eq!(lines[0].content, "\u{e9}\u{e9}");
        assert_eq!(lines[1].content, "z");
    }

    #[test]
    fn test_into_string_restores_text() {
        let line = Line {
            content: "x".to_string(),
            terminator: "\r\n".to_string(),
        };
        assert_eq!(line.into_string(), "x\r\n");
    }
}
