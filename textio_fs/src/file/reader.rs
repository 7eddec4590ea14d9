//! Lazy, forward-only sequence of decoded lines.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::split::{Line, LineSplitter};
use super::stream::{is_placeholder, open_input};
use crate::encoding::{Decoder, Encoding};
use crate::error::{FailureKind, IoError, Result, Role};
use crate::flags::ReadFlags;

const BOM_CHAR: char = '\u{feff}';

/// Configuration for file readers
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub flags: ReadFlags,
    /// Input encoding; sniffed from the first chunk when `None`
    pub encoding: Option<Encoding>,
    /// Split on this exact string instead of LF, CR and CR+LF
    pub delimiter: Option<String>,
    /// Bytes requested per read (default: 64KB)
    pub chunk_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            flags: ReadFlags::default(),
            encoding: None,
            delimiter: None,
            chunk_size: 64 * 1024,
        }
    }
}

struct ReaderState {
    path: PathBuf,
    flags: ReadFlags,
    source: Option<Box<dyn Read>>,
    decoder: Option<Decoder>,
    splitter: LineSplitter,
    chunk: Vec<u8>,
    line: Rc<str>,
    lines_pulled: u64,
    exhausted: bool,
    /// Failure hit while filling; raised once the lines before it are used up
    fill_error: Option<IoError>,
    /// Failure of an advance made by `Iterator::next`, reported on the next call
    pending_error: Option<IoError>,
}

impl ReaderState {
    fn advance(&mut self) -> Result<()> {
        match self.next_processed() {
            Ok(Some(line)) => {
                self.line = Rc::from(line);
                Ok(())
            }
            Ok(None) => {
                log::debug!("finished reading {}", self.path.display());
                self.close();
                Ok(())
            }
            Err(err) => {
                self.close();
                Err(err)
            }
        }
    }

    fn close(&mut self) {
        self.exhausted = true;
        self.source = None;
        self.line = Rc::from("");
    }

    fn next_processed(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.pull()? {
            self.lines_pulled += 1;
            let first = self.lines_pulled == 1;
            if let Some(text) = process_line(line, &self.flags, first) {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    fn pull(&mut self) -> Result<Option<Line>> {
        loop {
            if let Some(line) = self.splitter.next_line() {
                return Ok(Some(line));
            }
            if let Some(err) = self.fill_error.take() {
                return Err(err);
            }
            if self.splitter.is_done() {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    /// Read and decode one chunk into the splitter. Text decoded ahead of a
    /// malformed sequence still reaches the splitter; the failure is parked
    /// in `fill_error` and input stops there.
    fn fill(&mut self) -> Result<()> {
        let Some(source) = self.source.as_mut() else {
            self.splitter.finish();
            return Ok(());
        };
        let read = loop {
            match source.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(IoError::from_io(Role::Read, FailureKind::Read, &self.path, err));
                }
            }
        };
        log::trace!("read {} bytes from {}", read, self.path.display());

        let bytes = &self.chunk[..read];
        let last = read == 0;
        let decoder = self.decoder.get_or_insert_with(|| {
            let encoding = Encoding::detect(bytes);
            log::debug!("detected {} input", encoding);
            encoding.new_decoder()
        });
        let mut text = String::new();
        let decoded = decoder.decode(bytes, last, &mut text);
        self.splitter.push(&text);
        if let Err(err) = decoded {
            self.fill_error = Some(IoError::from_codec(
                Role::Read,
                FailureKind::Decode,
                &self.path,
                err,
            ));
            self.source = None;
            return Ok(());
        }
        if last {
            self.splitter.finish();
            self.source = None;
        }
        Ok(())
    }
}

/// Apply the flag-driven post-processing to one raw line, in order: BOM,
/// terminator canonicalization, terminator removal, whitespace trimming,
/// empty-line skipping. `None` means the line is skipped.
fn process_line(line: Line, flags: &ReadFlags, first: bool) -> Option<String> {
    let Line {
        mut content,
        mut terminator,
    } = line;

    if first && flags.strip_bom && content.starts_with(BOM_CHAR) {
        content.drain(..BOM_CHAR.len_utf8());
    }
    if !terminator.is_empty() {
        if flags.force_lf {
            terminator = "\n".to_string();
        } else if flags.force_crlf {
            terminator = "\r\n".to_string();
        }
    }
    if flags.strip_terminator {
        terminator.clear();
    }
    if flags.trim_all_ws {
        content = content.trim().to_string();
    } else if flags.trim_trailing_ws {
        content.truncate(content.trim_end().len());
    }
    if flags.skip_empty && content.is_empty() {
        return None;
    }
    content.push_str(&terminator);
    Some(content)
}

/// A forward-only sequence of decoded lines.
///
/// Clones share the underlying stream and position. `FileReader::default()`
/// is the exhausted reader, and any reader compares equal to it once its
/// stream is used up:
///
/// ```no_run
/// use textio_fs::{FileReader, ReadFlags};
///
/// let mut reader = FileReader::open("notes.txt", ReadFlags::default())?;
/// while reader != FileReader::default() {
///     if let Some(line) = reader.line() {
///         print!("{}", line);
///     }
///     reader.advance()?;
/// }
/// # Ok::<(), textio_fs::IoError>(())
/// ```
#[derive(Clone, Default)]
pub struct FileReader {
    state: Option<Rc<RefCell<ReaderState>>>,
}

impl FileReader {
    /// Open `path` as UTF-8 (or sniffed) text split on standard line breaks.
    pub fn open<P: AsRef<Path>>(path: P, flags: ReadFlags) -> Result<Self> {
        Self::open_with_config(
            path,
            &ReaderConfig {
                flags,
                ..ReaderConfig::default()
            },
        )
    }

    /// Open with custom configuration. The first line is read immediately.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let flags = config.flags;
        flags.validate()?;

        let use_stdin = flags.default_stdin && is_placeholder(path);
        let source = match open_input(path, use_stdin) {
            Ok(source) => source,
            Err(err) if flags.tolerate_missing && err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} does not exist, reading nothing", path.display());
                return Ok(FileReader::default());
            }
            Err(err) => return Err(IoError::from_io(Role::Read, FailureKind::Open, path, err)),
        };
        Self::with_source(path, source, config)
    }

    /// Read lines from an already open stream. `name` only labels errors
    /// and log output; `default_stdin` and `tolerate_missing` do not apply.
    pub fn from_stream<P, R>(name: P, stream: R, config: &ReaderConfig) -> Result<Self>
    where
        P: AsRef<Path>,
        R: Read + 'static,
    {
        config.flags.validate()?;
        Self::with_source(name.as_ref(), Box::new(stream), config)
    }

    fn with_source(path: &Path, source: Box<dyn Read>, config: &ReaderConfig) -> Result<Self> {
        let splitter = match &config.delimiter {
            Some(delimiter) => LineSplitter::with_delimiter(delimiter.as_str()),
            None => LineSplitter::new(),
        };
        let mut state = ReaderState {
            path: path.to_path_buf(),
            flags: config.flags,
            source: Some(source),
            decoder: config.encoding.map(|encoding| encoding.new_decoder()),
            splitter,
            chunk: vec![0u8; config.chunk_size.max(1)],
            line: Rc::from(""),
            lines_pulled: 0,
            exhausted: false,
            fill_error: None,
            pending_error: None,
        };
        state.advance()?;

        Ok(FileReader {
            state: Some(Rc::new(RefCell::new(state))),
        })
    }

    /// The current line; `None` once the sequence is exhausted.
    ///
    /// The returned text is a snapshot: it stays valid while this reader or
    /// a clone of it advances.
    pub fn line(&self) -> Option<Rc<str>> {
        let state = self.state.as_ref()?.borrow();
        if state.exhausted {
            return None;
        }
        Some(Rc::clone(&state.line))
    }

    /// Move to the next line. Failures exhaust the reader.
    pub fn advance(&mut self) -> Result<()> {
        match &self.state {
            Some(state) => {
                let mut state = state.borrow_mut();
                if state.exhausted {
                    return Ok(());
                }
                state.advance()
            }
            None => Ok(()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.as_ref().is_none_or(|state| state.borrow().exhausted)
    }

    /// Encoding in use; `None` before detection or for the default reader.
    pub fn encoding(&self) -> Option<Encoding> {
        let state = self.state.as_ref()?.borrow();
        state.decoder.as_ref().map(Decoder::encoding)
    }
}

impl PartialEq for FileReader {
    fn eq(&self, other: &Self) -> bool {
        if self.is_exhausted() || other.is_exhausted() {
            return self.is_exhausted() && other.is_exhausted();
        }
        match (&self.state, &other.state) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for FileReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => {
                let state = state.borrow();
                f.debug_struct("FileReader")
                    .field("path", &state.path)
                    .field("lines_pulled", &state.lines_pulled)
                    .field("exhausted", &state.exhausted)
                    .finish()
            }
            None => f.debug_struct("FileReader").field("exhausted", &true).finish(),
        }
    }
}

impl Iterator for FileReader {
    type Item = Result<String>;

    /// Yield the current line and advance. A failing advance is reported
    /// by the following call, after which the sequence ends.
    fn next(&mut self) -> Option<Self::Item> {
        let mut state = self.state.as_ref()?.borrow_mut();
        if let Some(err) = state.pending_error.take() {
            return Some(Err(err));
        }
        if state.exhausted {
            return None;
        }
        let line = state.line.to_string();
        if let Err(err) = state.advance() {
            state.pending_error = Some(err);
        }
        Some(Ok(line))
    }
}

/// Lines of `path` as an iterator.
pub fn read_lines<P: AsRef<Path>>(path: P, flags: ReadFlags) -> Result<FileReader> {
    FileReader::open(path, flags)
}
