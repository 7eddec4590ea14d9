//! # textio_fs - Line-oriented, encoding-aware file I/O
//!
//! Readers yield decoded lines lazily, writers encode text and manage
//! terminators and byte-order marks, and `load`/`save` move whole files.
//!
//! Modules:
//! - `bom` for byte-order marker detection (UTF-8/16/32)
//! - `encoding` for codecs and encoding detection
//! - `file` for line splitting, readers, writers and bulk I/O
//! - `flags` for reader and writer options
//! - `lock` for the per-path write lock registry

mod bom;
mod encoding;
mod error;
mod file;
mod flags;
mod lock;

pub use bom::{BomDetectionResult, detect_bom, strip_bom};
pub use encoding::{CodecError, Decoder, Encoding};
pub use error::{FailureKind, IoError, Result, Role};
pub use file::{
    FileReader, FileWriter, Line, LineSplitter, ReaderConfig, Terminator, WriterConfig, load,
    load_text, normalize_line_breaks, read_lines, save,
};
pub use flags::{ReadFlags, WriteFlags};
