//! Encoding-aware text sink with optional cross-writer serialization.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::eol::{Terminator, normalize_line_breaks};
use super::stream::{Destination, open_output};
use crate::encoding::Encoding;
use crate::error::{FailureKind, IoError, Result, Role};
use crate::flags::WriteFlags;
use crate::lock::{self, PathLock};

/// Configuration for file writers
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    pub flags: WriteFlags,
    /// Output encoding (default: UTF-8)
    pub encoding: Option<Encoding>,
}

struct WriterState {
    destination: Destination,
    flags: WriteFlags,
    encoding: Encoding,
    sink: Option<Box<dyn Write + Send>>,
    lock: Option<PathLock>,
    bom_pending: bool,
}

impl WriterState {
    fn write(&mut self, text: &str) -> Result<()> {
        let (bytes, ends_line) = self.encode(text)?;
        self.ensure_open()?;

        let mut out = Vec::with_capacity(bytes.len() + 4);
        if self.bom_pending {
            out.extend_from_slice(self.encoding.bom());
            self.bom_pending = false;
        }
        out.extend_from_slice(&bytes);
        let flush = self.lock.is_some() || (self.flags.line_buffered && ends_line);
        self.write_raw(&out, flush)
    }

    /// Line-break handling and terminators, then the codec. No lock is held.
    /// Also reports whether the text holds a line break, for line buffering.
    fn encode(&self, text: &str) -> Result<(Vec<u8>, bool)> {
        let flags = &self.flags;
        let mut text = if flags.force_crlf {
            normalize_line_breaks(text, Terminator::Crlf)
        } else if flags.force_lf {
            normalize_line_breaks(text, Terminator::Lf)
        } else {
            Cow::Borrowed(text)
        };

        let needs_terminator = flags.force_terminator
            || (flags.auto_terminator && Terminator::trailing(&text).is_none());
        if needs_terminator {
            let terminator = if flags.force_crlf {
                Terminator::Crlf
            } else {
                Terminator::Lf
            };
            text.to_mut().push_str(terminator.as_str());
        }

        let bytes = self.encoding.encode(&text).map_err(|err| {
            IoError::from_codec(Role::Write, FailureKind::Encode, self.destination.name(), err)
        })?;
        Ok((bytes, text.contains(['\n', '\r'])))
    }

    fn ensure_open(&mut self) -> Result<()> {
        if self.sink.is_some() {
            return Ok(());
        }
        let name = self.destination.name();
        // Opening may truncate, so it happens under the lock too.
        let path_lock = self.flags.serialize_writes.then(|| lock::lock_for(&name));
        let guard = path_lock.as_ref().map(lock::acquire);
        let sink = open_output(&self.destination, &self.flags)
            .map_err(|err| IoError::from_io(Role::Write, FailureKind::Open, &name, err))?;
        drop(guard);
        self.lock = path_lock;
        self.bom_pending = self.flags.insert_bom && sink.fresh;
        self.sink = Some(sink.writer);
        Ok(())
    }

    /// Hand encoded bytes to the sink, holding the path lock if serialized.
    /// With `flush` the bytes reach the OS before the lock is released.
    fn write_raw(&mut self, bytes: &[u8], flush: bool) -> Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        let name = || self.destination.name();
        let _guard = self.lock.as_ref().map(lock::acquire);

        sink.write_all(bytes)
            .map_err(|err| IoError::from_io(Role::Write, FailureKind::Write, name(), err))?;
        if flush {
            sink.flush()
                .map_err(|err| IoError::from_io(Role::Write, FailureKind::Flush, name(), err))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        let _guard = self.lock.as_ref().map(lock::acquire);
        sink.flush().map_err(|err| {
            IoError::from_io(Role::Write, FailureKind::Flush, self.destination.name(), err)
        })
    }
}

impl Drop for WriterState {
    fn drop(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let _guard = self.lock.as_ref().map(lock::acquire);
        if let Err(err) = sink.flush() {
            log::warn!(
                "failed to flush {} on close: {}",
                self.destination.name().display(),
                err
            );
        } else {
            log::debug!("closed {}", self.destination.name().display());
        }
    }
}

/// A text sink over a file or standard stream.
///
/// Clones share the handle; the destination is opened on the first
/// `write` or `flush` and flushed when the last clone is dropped.
#[derive(Clone)]
pub struct FileWriter {
    state: Arc<Mutex<WriterState>>,
}

impl FileWriter {
    /// UTF-8 writer for `path`.
    pub fn create<P: AsRef<Path>>(path: P, flags: WriteFlags) -> Result<Self> {
        Self::create_with_config(
            path,
            &WriterConfig {
                flags,
                encoding: None,
            },
        )
    }

    /// Writer with custom configuration.
    pub fn create_with_config<P: AsRef<Path>>(path: P, config: &WriterConfig) -> Result<Self> {
        let path = path.as_ref();
        let flags = config.flags;
        flags.validate()?;

        let destination = Destination::resolve(path, &flags)
            .ok_or_else(|| IoError::write(FailureKind::Open, path, 0))?;
        let state = WriterState {
            destination,
            flags,
            encoding: config.encoding.unwrap_or_default(),
            sink: None,
            lock: None,
            bom_pending: false,
        };
        Ok(FileWriter {
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Encode and write `text` as one unit.
    pub fn write(&self, text: &str) -> Result<()> {
        self.state().write(text)
    }

    /// Push buffered bytes to the OS.
    pub fn flush(&self) -> Result<()> {
        self.state().flush()
    }

    pub fn encoding(&self) -> Encoding {
        self.state().encoding
    }

    /// Destination path, or `<stdout>` / `<stderr>`.
    pub fn path(&self) -> PathBuf {
        self.state().destination.name()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, WriterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writers are equal when they share one handle, i.e. one is a clone of the other.
impl PartialEq for FileWriter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for FileWriter {}

impl fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("FileWriter")
            .field("destination", &state.destination)
            .field("encoding", &state.encoding)
            .field("open", &state.sink.is_some())
            .finish()
    }
}
