//! Option records for readers and writers.
//!
//! Each option is a named field; `Default` turns everything off. Records can
//! also be parsed from the compact letter codes used on the command line
//! (`"Bsz"` = strip BOM, strip terminators, skip empty lines).

use crate::error::{FailureKind, IoError, Result};

/// Options recognized by [`crate::FileReader`] and [`crate::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadFlags {
    /// Remove a byte-order marker from the start of the input
    pub strip_bom: bool,
    /// Canonicalize every terminator to LF
    pub force_lf: bool,
    /// Canonicalize every terminator to CR+LF
    pub force_crlf: bool,
    /// Read standard input when the path is empty or `-`
    pub default_stdin: bool,
    /// Treat a nonexistent file as empty
    pub tolerate_missing: bool,
    /// Drop the terminator from each line
    pub strip_terminator: bool,
    /// Trim whitespace at the end of each line
    pub trim_trailing_ws: bool,
    /// Trim whitespace at both ends of each line
    pub trim_all_ws: bool,
    /// Omit lines that are empty after trimming
    pub skip_empty: bool,
}

impl ReadFlags {
    /// Parse letter codes: `B n c i f s t S z`.
    pub fn from_letters(letters: &str) -> Result<Self> {
        let mut flags = ReadFlags::default();
        for letter in letters.chars() {
            match letter {
                'B' => flags.strip_bom = true,
                'n' => flags.force_lf = true,
                'c' => flags.force_crlf = true,
                'i' => flags.default_stdin = true,
                'f' => flags.tolerate_missing = true,
                's' => flags.strip_terminator = true,
                't' => flags.trim_trailing_ws = true,
                'S' => flags.trim_all_ws = true,
                'z' => flags.skip_empty = true,
                other => return Err(unknown_letter(other, "reader")),
            }
        }
        flags.validate()?;
        Ok(flags)
    }

    /// Reject mutually exclusive combinations.
    pub fn validate(&self) -> Result<()> {
        if self.force_lf && self.force_crlf {
            return Err(conflict("force_lf", "force_crlf"));
        }
        Ok(())
    }
}

/// Options recognized by [`crate::FileWriter`] and [`crate::save`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteFlags {
    /// Write the encoding's byte-order marker once at the start of the file
    pub insert_bom: bool,
    /// Convert every line break in written text to LF
    pub force_lf: bool,
    /// Convert every line break in written text to CR+LF
    pub force_crlf: bool,
    /// Write to standard output when the path is empty or `-`
    pub default_stdout: bool,
    /// Write to standard error when the path is empty or `-`
    pub default_stderr: bool,
    /// Open an existing file and write at its end
    pub append: bool,
    /// Flush at every line break
    pub line_buffered: bool,
    /// Hand every write straight to the OS
    pub unbuffered: bool,
    /// Append a terminator after every write
    pub force_terminator: bool,
    /// Append a terminator unless the text already ends with one
    pub auto_terminator: bool,
    /// Hold the process-wide lock for the path around each raw write
    pub serialize_writes: bool,
}

impl WriteFlags {
    /// Parse letter codes: `B n c o e a l u L A m`.
    pub fn from_letters(letters: &str) -> Result<Self> {
        let mut flags = WriteFlags::default();
        for letter in letters.chars() {
            match letter {
                'B' => flags.insert_bom = true,
                'n' => flags.force_lf = true,
                'c' => flags.force_crlf = true,
                'o' => flags.default_stdout = true,
                'e' => flags.default_stderr = true,
                'a' => flags.append = true,
                'l' => flags.line_buffered = true,
                'u' => flags.unbuffered = true,
                'L' => flags.force_terminator = true,
                'A' => flags.auto_terminator = true,
                'm' => flags.serialize_writes = true,
                other => return Err(unknown_letter(other, "writer")),
            }
        }
        flags.validate()?;
        Ok(flags)
    }

    /// Reject mutually exclusive combinations.
    pub fn validate(&self) -> Result<()> {
        let exclusive = [
            (self.force_lf && self.force_crlf, "force_lf", "force_crlf"),
            (
                self.default_stdout && self.default_stderr,
                "default_stdout",
                "default_stderr",
            ),
            (self.line_buffered && self.unbuffered, "line_buffered", "unbuffered"),
            (
                self.force_terminator && self.auto_terminator,
                "force_terminator",
                "auto_terminator",
            ),
        ];
        match exclusive.iter().find(|(both, _, _)| *both) {
            Some((_, a, b)) => Err(conflict(a, b)),
            None => Ok(()),
        }
    }
}

fn conflict(a: &str, b: &str) -> IoError {
    IoError::new(
        FailureKind::Flags,
        format!("Conflicting flags: {} and {}", a, b),
    )
}

fn unknown_letter(letter: char, role: &str) -> IoError {
    IoError::new(
        FailureKind::Flags,
        format!("Unknown {} flag: {:?}", role, letter),
    )
}
