//! Whole-buffer writes that bypass the codec.

use std::io::Write;
use std::path::Path;

use super::stream::{Destination, open_output};
use crate::bom::detect_bom;
use crate::encoding::Encoding;
use crate::error::{FailureKind, IoError, Result, Role};
use crate::flags::WriteFlags;
use crate::lock;

/// Write `bytes` to `path` in one call.
///
/// Honors `append`, the standard-stream destination flags, `serialize_writes`
/// and `insert_bom`, which prepends a UTF-8 marker when the file starts out
/// empty and `bytes` does not already begin with a marker. Buffering and
/// line-break flags do not apply.
pub fn save<P: AsRef<Path>>(path: P, bytes: &[u8], flags: &WriteFlags) -> Result<()> {
    let path = path.as_ref();
    flags.validate()?;

    let destination = Destination::resolve(path, flags)
        .ok_or_else(|| IoError::write(FailureKind::Open, path, 0))?;
    let name = destination.name();
    let raw = WriteFlags {
        unbuffered: true,
        line_buffered: false,
        ..*flags
    };
    // Held from open on: truncation must not cut into another flagged write.
    let path_lock = flags.serialize_writes.then(|| lock::lock_for(&name));
    let _guard = path_lock.as_ref().map(lock::acquire);
    let mut sink = open_output(&destination, &raw)
        .map_err(|err| IoError::from_io(Role::Write, FailureKind::Open, &name, err))?;

    let mut out = Vec::with_capacity(bytes.len() + 3);
    if flags.insert_bom && sink.fresh && detect_bom(bytes).is_none() {
        out.extend_from_slice(Encoding::Utf8.bom());
    }
    out.extend_from_slice(bytes);

    sink.writer
        .write_all(&out)
        .map_err(|err| IoError::from_io(Role::Write, FailureKind::Write, &name, err))?;
    sink.writer
        .flush()
        .map_err(|err| IoError::from_io(Role::Write, FailureKind::Flush, &name, err))?;
    log::debug!("saved {} bytes to {}", out.len(), name.display());
    Ok(())
}
