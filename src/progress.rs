//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn RenameProgressCallback>`] via
//! [`crate::config::RenameConfigBuilder::progress_callback`] to receive
//! real-time events as the batch works through each document.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a log file, or a UI
//! widget without the library knowing anything about how the host
//! application communicates. The retry countdown in particular belongs to
//! the caller's presentation layer — the library only reports that it is
//! waiting and for how much longer.

use crate::error::FileError;
use std::sync::Arc;

/// Called by the batch loop as it processes each document.
///
/// Documents are processed strictly sequentially, so implementations are
/// never invoked concurrently; the `Send + Sync` bound exists only because
/// the callback crosses `await` points inside the Tokio runtime. All
/// methods have default no-op implementations so callers only override
/// what they care about.
pub trait RenameProgressCallback: Send + Sync {
    /// Called once before any document is processed.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a document's first page is rasterised.
    ///
    /// `index` is 0-based.
    fn on_file_start(&self, index: usize, total: usize, original_name: &str) {
        let _ = (index, total, original_name);
    }

    /// Called once per second while the processor waits out a rate-limit
    /// back-off before retrying.
    ///
    /// # Arguments
    /// * `original_name`     — document being retried
    /// * `attempt`           — 1-indexed attempt that just failed
    /// * `seconds_remaining` — whole seconds left before the next attempt
    fn on_retry_wait(&self, original_name: &str, attempt: u32, seconds_remaining: u64) {
        let _ = (original_name, attempt, seconds_remaining);
    }

    /// Called when a document received its convention-compliant name.
    fn on_file_renamed(&self, index: usize, total: usize, original_name: &str, new_name: &str) {
        let _ = (index, total, original_name, new_name);
    }

    /// Called when a document failed terminally (unreadable file,
    /// exhausted retries, or a non-retryable provider error).
    fn on_file_error(&self, index: usize, total: usize, original_name: &str, error: &FileError) {
        let _ = (index, total, original_name, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenameProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenameConfig`].
pub type ProgressCallback = Arc<dyn RenameProgressCallback>;
