//! Line-oriented reading and writing on top of the codecs.
//!
//! This module provides:
//! - Incremental line splitting across read chunks
//! - Lazy line readers with flag-driven post-processing
//! - Encoding writers with terminator and BOM handling
//! - Whole-file load and save

pub mod eol;
pub mod load;
pub mod reader;
pub mod save;
pub mod split;
pub mod stream;
pub mod writer;

pub use eol::{Terminator, normalize_line_breaks};
pub use load::{load, load_text};
pub use reader::{FileReader, ReaderConfig, read_lines};
pub use save::save;
pub use split::{Line, LineSplitter};
pub use writer::{FileWriter, WriterConfig};
