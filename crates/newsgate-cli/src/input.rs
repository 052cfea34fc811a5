//! Batch file loading and JSON-lines output for `newsgate run`.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use newsgate_core::{CandidateBatch, ClassifiedRecord};

/// Read candidate batches from `path` (`-` reads stdin) and cap every
/// snippet at `snippet_limit` characters.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a JSON array of batches.
pub(crate) fn load_batches(path: &Path, snippet_limit: usize) -> anyhow::Result<Vec<CandidateBatch>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read batches from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batches file {}", path.display()))?
    };
    parse_batches(&raw, snippet_limit)
}

pub(crate) fn parse_batches(raw: &str, snippet_limit: usize) -> anyhow::Result<Vec<CandidateBatch>> {
    let mut batches: Vec<CandidateBatch> =
        serde_json::from_str(raw).context("batches must be a JSON array of {category, window, records}")?;
    for record in batches.iter_mut().flat_map(|b| b.records.iter_mut()) {
        truncate_chars(&mut record.snippet, snippet_limit);
    }
    Ok(batches)
}

/// Truncate to at most `limit` characters, never splitting a code point.
pub(crate) fn truncate_chars(text: &mut String, limit: usize) {
    if let Some((byte_idx, _)) = text.char_indices().nth(limit) {
        text.truncate(byte_idx);
    }
}

/// Write one JSON object per line.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub(crate) fn write_json_lines<W: Write>(
    writer: &mut W,
    records: &[ClassifiedRecord],
) -> anyhow::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
