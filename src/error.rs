//! Error types for the docname library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DocnameError`] — **Fatal**: the batch cannot proceed at all
//!   (missing or rejected API key, invalid configuration, archive
//!   serialisation failure). Returned as `Err(DocnameError)` from the
//!   top-level batch functions.
//!
//! * [`FileError`] — **Non-fatal**: a single document failed (unreadable
//!   PDF, exhausted retries) but the rest of the batch is fine. Stored
//!   inside [`crate::output::FileResult`] so callers can inspect partial
//!   success rather than losing the whole batch to one bad file.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first bad document, log and continue, or collect everything for a
//! post-run report.

use thiserror::Error;

/// All fatal errors returned by the docname library.
///
/// Per-document failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum DocnameError {
    /// No API key was supplied via config or environment.
    #[error("No API key configured.\nSet GEMINI_API_KEY or pass --api-key.")]
    MissingApiKey,

    /// The model-listing call failed, which means the key is unusable.
    #[error("API key was rejected: the model catalog could not be listed.\nCheck the key and your network connection.")]
    InvalidApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The batch archive could not be serialised.
    #[error("Failed to build the batch archive: {0}")]
    ArchiveFailed(#[from] zip::result::ZipError),

    /// Could not read an input document or write a renamed copy.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
///
/// Stored in [`crate::output::FileResult`] when a document fails.
/// The batch always continues to the next document.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The document could not be opened as a PDF or its first page could
    /// not be rasterised. Reported before any model call is made.
    #[error("unreadable PDF file")]
    UnreadablePdf,

    /// Every attempt hit a rate-limit or quota error.
    #[error("server overloaded after {attempts} attempts")]
    ServerOverloaded { attempts: u32 },

    /// The provider returned a non-retryable error; its text is surfaced
    /// verbatim.
    #[error("{message}")]
    Api { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_pdf_display_is_fixed() {
        assert_eq!(FileError::UnreadablePdf.to_string(), "unreadable PDF file");
    }

    #[test]
    fn overloaded_display_names_attempts() {
        let e = FileError::ServerOverloaded { attempts: 5 };
        assert_eq!(e.to_string(), "server overloaded after 5 attempts");
    }

    #[test]
    fn api_error_display_is_verbatim() {
        let e = FileError::Api {
            message: "model not found".into(),
        };
        assert_eq!(e.to_string(), "model not found");
    }

    #[test]
    fn missing_key_display_mentions_env_var() {
        assert!(DocnameError::MissingApiKey
            .to_string()
            .contains("GEMINI_API_KEY"));
    }
}
