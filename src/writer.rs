//! Output file writer.

use crate::error::PipelineError;
use crate::model::MonsterRecord;
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_OUTPUT_PATH: &str = "monsters.json";

const INDENT: &[u8] = b"    ";

/// Write `records` as a 4-space indented JSON array, replacing `path`.
///
/// The payload lands in a temporary file beside `path` and is renamed over it,
/// so readers never observe a half-written file.
pub fn write_records(records: &[MonsterRecord], path: &Path) -> Result<(), PipelineError> {
    let io_err = |source: io::Error| PipelineError::IoWrite {
        path: path.to_path_buf(),
        source,
    };

    let payload = render(records).map_err(io_err)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(&payload).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

fn render(records: &[MonsterRecord]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer).map_err(io::Error::other)?;
    Ok(buf)
}
