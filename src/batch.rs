//! Batch orchestration: the sequential per-document loop.
//!
//! ## Why sequential?
//!
//! The tool runs inside a single interactive session against a free-tier
//! quota measured per minute. One request in flight at a time is the
//! whole point — parallel calls would only trip the rate limiter faster
//! and make the fixed back-off arithmetic meaningless. Documents are
//! processed strictly in input order and one failure never aborts the
//! rest of the batch.

use crate::config::RenameConfig;
use crate::error::DocnameError;
use crate::gemini::{GeminiClient, VisionModel};
use crate::output::{BatchOutput, BatchStats, FileResult};
use crate::pipeline::naming;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// One uploaded document: original filename plus owned raw bytes.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk, keeping only the file name component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocnameError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DocnameError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Rename a batch of documents using the Gemini API.
///
/// This is the primary entry point for the library. It resolves the API
/// key (config first, then `GEMINI_API_KEY`), selects a model from the
/// catalog unless one was configured, and runs the sequential loop.
///
/// # Errors
/// Returns `Err(DocnameError)` only for batch-fatal conditions — a
/// missing or rejected API key. Per-document failures are recorded in
/// the returned [`BatchOutput`].
pub async fn rename_batch(
    inputs: &[DocumentInput],
    config: &RenameConfig,
) -> Result<BatchOutput, DocnameError> {
    let api_key = match config.api_key.clone() {
        Some(key) if !key.is_empty() => key,
        _ => std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(DocnameError::MissingApiKey)?,
    };

    let client = GeminiClient::new(api_key, config.api_timeout_secs);

    let model_name = match config.model.clone() {
        Some(name) => name,
        // A listing failure means the key is unusable; stop before any
        // document is touched.
        None => client
            .select_model()
            .await
            .ok_or(DocnameError::InvalidApiKey)?,
    };
    info!("Connected; using model {}", model_name);

    let model = client.into_model(model_name);
    Ok(rename_batch_with_model(&model, inputs, config).await)
}

/// Run the batch loop against an already-constructed model.
///
/// Split out from [`rename_batch`] so callers (and tests) can inject any
/// [`VisionModel`] implementation.
pub async fn rename_batch_with_model(
    model: &dyn VisionModel,
    inputs: &[DocumentInput],
    config: &RenameConfig,
) -> BatchOutput {
    let start = Instant::now();
    let total = inputs.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results: Vec<FileResult> = Vec::with_capacity(total);
    let mut successes: Vec<(String, Vec<u8>)> = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, &input.name);
        }
        debug!("Processing {}/{}: {}", index + 1, total, input.name);

        let result = naming::name_document(model, &input.name, input.bytes.clone(), config).await;

        if let Some(ref cb) = config.progress_callback {
            match (&result.new_name, &result.error) {
                (Some(new_name), _) => cb.on_file_renamed(index, total, &input.name, new_name),
                (None, Some(error)) => cb.on_file_error(index, total, &input.name, error),
                (None, None) => {}
            }
        }

        if let Some(ref new_name) = result.new_name {
            successes.push((new_name.clone(), input.bytes.clone()));
        }
        results.push(result);
    }

    let renamed = results.iter().filter(|r| r.is_success()).count();
    let stats = BatchStats {
        total_files: total,
        renamed_files: renamed,
        failed_files: total - renamed,
        total_attempts: results.iter().map(|r| r.attempts as u64).sum(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, renamed);
    }
    info!(
        "Batch complete: {}/{} renamed in {}ms",
        renamed, total, stats.total_duration_ms
    );

    BatchOutput {
        results,
        successes,
        stats,
    }
}

/// Synchronous wrapper around [`rename_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn rename_batch_sync(
    inputs: &[DocumentInput],
    config: &RenameConfig,
) -> Result<BatchOutput, DocnameError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocnameError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(rename_batch(inputs, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_input_from_missing_path_is_io_error() {
        let err = DocumentInput::from_path("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, DocnameError::Io { .. }));
    }

    #[test]
    fn document_input_keeps_file_name_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan 042.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let input = DocumentInput::from_path(&path).unwrap();
        assert_eq!(input.name, "scan 042.pdf");
        assert_eq!(input.bytes, b"%PDF-1.4");
    }
}
