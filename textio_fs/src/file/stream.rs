//! Filesystem adapter: resolves destinations and opens raw handles.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::flags::WriteFlags;

/// Empty paths and `-` stand for the standard streams.
pub fn is_placeholder(path: &Path) -> bool {
    path.as_os_str().is_empty() || path == Path::new("-")
}

/// Open `path` for reading, or standard input when `use_stdin` is set.
pub fn open_input(path: &Path, use_stdin: bool) -> io::Result<Box<dyn Read>> {
    if use_stdin {
        log::debug!("reading from standard input");
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(path)?;
    log::debug!("opened {} for reading", path.display());
    Ok(Box::new(file))
}

/// Where written bytes end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
    Stderr,
}

impl Destination {
    /// Explicit path first, then the standard stream selected by the flags.
    pub fn resolve(path: &Path, flags: &WriteFlags) -> Option<Destination> {
        if !is_placeholder(path) {
            Some(Destination::File(path.to_path_buf()))
        } else if flags.default_stdout {
            Some(Destination::Stdout)
        } else if flags.default_stderr {
            Some(Destination::Stderr)
        } else {
            None
        }
    }

    /// Name used in error messages and as the write lock key.
    pub fn name(&self) -> PathBuf {
        match self {
            Destination::File(path) => path.clone(),
            Destination::Stdout => PathBuf::from("<stdout>"),
            Destination::Stderr => PathBuf::from("<stderr>"),
        }
    }
}

/// A freshly opened output handle.
pub struct Sink {
    pub writer: Box<dyn Write + Send>,
    /// Whether the file starts out empty, i.e. a BOM belongs at the front
    pub fresh: bool,
}

/// Open the destination with the buffering the flags ask for.
///
/// Line buffering is left to the caller, which knows where encoded line
/// breaks end; here it gets the same buffer as the default mode.
pub fn open_output(destination: &Destination, flags: &WriteFlags) -> io::Result<Sink> {
    let (raw, fresh): (Box<dyn Write + Send>, bool) = match destination {
        Destination::File(path) => {
            let file = if flags.append {
                OpenOptions::new().append(true).create(true).open(path)?
            } else {
                File::create(path)?
            };
            let fresh = !flags.append || file.metadata()?.len() == 0;
            log::debug!(
                "opened {} for writing (append: {}, fresh: {})",
                path.display(),
                flags.append,
                fresh
            );
            (Box::new(file), fresh)
        }
        Destination::Stdout => (Box::new(io::stdout()), false),
        Destination::Stderr => (Box::new(io::stderr()), false),
    };

    let writer: Box<dyn Write + Send> = if flags.unbuffered {
        raw
    } else {
        Box::new(BufWriter::new(raw))
    };
    Ok(Sink { writer, fresh })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_paths() {
        assert!(is_placeholder(Path::new("")));
        assert!(is_placeholder(Path::new("-")));
        assert!(!is_placeholder(Path::new("file.txt")));
    }

    #[test]
    fn test_stdin_routing_skips_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");
        assert!(open_input(&missing, true).is_ok());
        let err = open_input(&missing, false).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_destination() {
        let none = WriteFlags::default();
        let stdout = WriteFlags {
            default_stdout: true,
            ..WriteFlags::default()
        };
        let stderr = WriteFlags {
            default_stderr: true,
            ..WriteFlags::default()
        };
        assert_eq!(
            Destination::resolve(Path::new("out.txt"), &stdout),
            Some(Destination::File(PathBuf::from("out.txt")))
        );
        assert_eq!(Destination::resolve(Path::new(""), &stdout), Some(Destination::Stdout));
        assert_eq!(Destination::resolve(Path::new("-"), &stderr), Some(Destination::Stderr));
        assert_eq!(Destination::resolve(Path::new(""), &none), None);
    }

    #[test]
    fn test_append_to_existing_file_is_not_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "old\n").unwrap();

        let append = WriteFlags {
            append: true,
            ..WriteFlags::default()
        };
        let sink = open_output(&Destination::File(path.clone()), &append).unwrap();
        assert!(!sink.fresh);

        let sink = open_output(&Destination::File(path.clone()), &WriteFlags::default()).unwrap();
        assert!(sink.fresh);
        drop(sink);
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }
}
