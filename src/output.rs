//! Result types produced by a renaming batch.

use crate::error::FileError;
use serde::{Deserialize, Serialize};

/// Outcome for one document: exactly one of `new_name` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// Filename the document was uploaded with.
    pub original_name: String,
    /// Convention-compliant name; always ends in `.pdf`.
    pub new_name: Option<String>,
    /// Terminal failure, when no name could be produced.
    pub error: Option<FileError>,
    /// Model calls made for this document (0 when the PDF was unreadable).
    pub attempts: u32,
    /// Wall-clock time spent on this document, back-off waits included.
    pub duration_ms: u64,
}

impl FileResult {
    /// Whether the document received a name.
    pub fn is_success(&self) -> bool {
        self.new_name.is_some()
    }
}

/// Aggregate counters for one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_files: usize,
    pub renamed_files: usize,
    pub failed_files: usize,
    /// Model calls across the whole batch, retries included.
    pub total_attempts: u64,
    pub total_duration_ms: u64,
}

/// Everything a batch run produced.
///
/// Per-file outcomes stay in input order. Successful documents keep their
/// original bytes alongside the computed name so the batch archive can be
/// serialised once, after the loop.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchOutput {
    /// One entry per input document, in input order.
    pub results: Vec<FileResult>,
    /// `(computed name, original bytes)` for each success, in input order.
    #[serde(skip)]
    pub successes: Vec<(String, Vec<u8>)>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Serialise all successes into a single in-memory ZIP archive.
    ///
    /// Returns `None` when the batch produced no successes. Entries are
    /// keyed by computed name; when two documents computed the same name
    /// the later one wins, so archive keys are unique.
    pub fn zip_bytes(&self) -> Result<Option<Vec<u8>>, crate::error::DocnameError> {
        if self.successes.is_empty() {
            return Ok(None);
        }
        crate::pipeline::archive::build_zip(&self.successes).map(Some)
    }
}
