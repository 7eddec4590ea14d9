//! Uniform failure shape for every open, read, write, decode and encode error.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::encoding::CodecError;

const READ_ERROR: &str = "Read error";
const WRITE_ERROR: &str = "Write error";

/// Which side of the I/O a failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Not tied to reading or writing (flag validation)
    General,
    Read,
    Write,
}

/// The operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Open,
    Read,
    Write,
    Flush,
    Decode,
    Encode,
    /// Mutually exclusive flags were combined
    Flags,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Open => write!(f, "open"),
            FailureKind::Read => write!(f, "read"),
            FailureKind::Write => write!(f, "write"),
            FailureKind::Flush => write!(f, "flush"),
            FailureKind::Decode => write!(f, "decode"),
            FailureKind::Encode => write!(f, "encode"),
            FailureKind::Flags => write!(f, "flags"),
        }
    }
}

/// An I/O failure with enough context to build a diagnostic.
///
/// The display text is assembled once at construction:
/// `<message>[ for file: <name>][ (error <code>)]`.
#[derive(Debug, Error)]
#[error("{text}")]
pub struct IoError {
    text: String,
    message: String,
    role: Role,
    kind: FailureKind,
    file: Option<PathBuf>,
    code: i32,
    #[source]
    source: Option<io::Error>,
}

impl IoError {
    /// Role-less error carrying only a message.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::build(Role::General, kind, message.into(), None, 0, None)
    }

    /// Read-role failure for `file` with an OS error code (0 = none).
    pub fn read(kind: FailureKind, file: impl AsRef<Path>, code: i32) -> Self {
        let file = Some(file.as_ref().to_path_buf());
        Self::build(Role::Read, kind, READ_ERROR.to_string(), file, code, None)
    }

    /// Write-role failure for `file` with an OS error code (0 = none).
    pub fn write(kind: FailureKind, file: impl AsRef<Path>, code: i32) -> Self {
        let file = Some(file.as_ref().to_path_buf());
        Self::build(Role::Write, kind, WRITE_ERROR.to_string(), file, code, None)
    }

    /// Wrap an `io::Error` coming out of the filesystem layer.
    pub fn from_io(
        role: Role,
        kind: FailureKind,
        file: impl AsRef<Path>,
        err: io::Error,
    ) -> Self {
        let code = err.raw_os_error().unwrap_or(0);
        let message = match role {
            Role::Read => READ_ERROR.to_string(),
            Role::Write => WRITE_ERROR.to_string(),
            Role::General => err.to_string(),
        };
        let file = Some(file.as_ref().to_path_buf());
        Self::build(role, kind, message, file, code, Some(err))
    }

    /// Wrap a codec failure; it carries no OS error code.
    pub fn from_codec(
        role: Role,
        kind: FailureKind,
        file: impl AsRef<Path>,
        err: CodecError,
    ) -> Self {
        Self::from_io(role, kind, file, io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn build(
        role: Role,
        kind: FailureKind,
        message: String,
        file: Option<PathBuf>,
        code: i32,
        source: Option<io::Error>,
    ) -> Self {
        let file = file.filter(|f| !f.as_os_str().is_empty());
        let text = assemble(&message, file.as_deref(), code);
        IoError {
            text,
            message,
            role,
            kind,
            file,
            code,
            source,
        }
    }

    /// Base message without the file and code suffixes.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// File name in native form, if the failure concerns a file.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// OS error code, 0 if none.
    pub fn code(&self) -> i32 {
        self.code
    }
}

fn assemble(message: &str, file: Option<&Path>, code: i32) -> String {
    let mut text = message.to_string();
    if let Some(file) = file {
        text.push_str(" for file: ");
        text.push_str(&file.display().to_string());
    }
    if code != 0 {
        text.push_str(&format!(" (error {})", code));
    }
    text
}

/// Result type for textio operations
pub type Result<T> = std::result::Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_assembly_all_segments() {
        let err = IoError::read(FailureKind::Open, "/tmp/missing.txt", 2);
        assert_eq!(err.to_string(), "Read error for file: /tmp/missing.txt (error 2)");
        assert_eq!(err.role(), Role::Read);
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn test_message_assembly_optional_segments() {
        let err = IoError::write(FailureKind::Encode, "out.txt", 0);
        assert_eq!(err.to_string(), "Write error for file: out.txt");

        let err = IoError::write(FailureKind::Write, "", 5);
        assert_eq!(err.to_string(), "Write error (error 5)");
        assert!(err.file().is_none());

        let err = IoError::new(FailureKind::Flags, "Conflicting flags");
        assert_eq!(err.to_string(), "Conflicting flags");
        assert_eq!(err.role(), Role::General);
    }

    #[test]
    fn test_from_io_keeps_os_code_and_source() {
        let io_err = io::Error::from_raw_os_error(13);
        let err = IoError::from_io(Role::Write, FailureKind::Open, "locked.txt", io_err);
        assert_eq!(err.code(), 13);
        assert_eq!(err.message(), "Write error");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_codec_failure_has_no_os_code() {
        let codec = CodecError::UnknownEncoding("x".to_string());
        let err = IoError::from_codec(Role::Read, FailureKind::Decode, "in.txt", codec);
        assert_eq!(err.code(), 0);
        assert_eq!(err.kind(), FailureKind::Decode);
        assert_eq!(err.to_string(), "Read error for file: in.txt");
    }
}
