//! Batch archive: bundle renamed documents into one in-memory ZIP.
//!
//! The archive is built once, after the batch loop, from successes only.
//! Entry names are the computed filenames; the stored bytes are the
//! original uploaded documents, unmodified — the tool renames, it never
//! rewrites content.

use crate::error::DocnameError;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Fixed filename offered for the combined download.
pub const DEFAULT_ARCHIVE_NAME: &str = "renamed_documents.zip";

/// Serialise `(name, bytes)` pairs into a ZIP held in memory.
///
/// When two documents computed the same name, the later entry replaces
/// the earlier one, so archive keys are unique.
pub fn build_zip(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, DocnameError> {
    // Last write wins; preserve the order in which names first appeared.
    let mut unique: Vec<(&str, &[u8])> = Vec::with_capacity(entries.len());
    for (name, bytes) in entries {
        match unique.iter_mut().find(|(n, _)| *n == name.as_str()) {
            Some(slot) => slot.1 = bytes.as_slice(),
            None => unique.push((name.as_str(), bytes.as_slice())),
        }
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in unique {
        writer.start_file(name, options.clone())?;
        writer.write_all(bytes).map_err(|e| DocnameError::Io {
            path: name.to_string(),
            source: e,
        })?;
    }

    let cursor = writer.finish()?;
    let buf = cursor.into_inner();
    debug!("Batch archive serialised → {} bytes", buf.len());
    Ok(buf)
}
