//! # docname
//!
//! Rename scanned PDF documents to a company filing convention using a
//! vision model.
//!
//! ## Why this crate?
//!
//! Offices that digitise paper documents end up with folders full of
//! `Scan_0041.pdf`. The information needed for a proper filing name —
//! date, document type, reference number, subject — is printed on the
//! first page, so this crate rasterises that page, shows it to a Gemini
//! vision model together with the filing convention
//! (`YY.MM.DD_TYPE_Number_Content_Status.pdf`), and applies the name the
//! model reads off the letterhead.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Select   pick a vision-capable model from the Gemini catalog
//!  ├─ 2. Render   rasterise page 1 via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Encode   page → PNG bytes
//!  ├─ 4. Name     prompt + image → filename, fixed-interval retry on 429
//!  ├─ 5. Collect  per-file success/error, batch never aborts
//!  └─ 6. Archive  successes → one in-memory ZIP
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docname::{rename_batch, DocumentInput, RenameConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from GEMINI_API_KEY
//!     let config = RenameConfig::default();
//!     let inputs = vec![DocumentInput::from_path("Scan_0041.pdf")?];
//!     let output = rename_batch(&inputs, &config).await?;
//!     for result in &output.results {
//!         match &result.new_name {
//!             Some(name) => println!("{} → {}", result.original_name, name),
//!             None => eprintln!("{}: {}", result.original_name,
//!                 result.error.as_ref().unwrap()),
//!         }
//!     }
//!     if let Some(zip) = output.zip_bytes()? {
//!         std::fs::write("renamed_documents.zip", zip)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docname` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docname = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod gemini;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{rename_batch, rename_batch_sync, rename_batch_with_model, DocumentInput};
pub use config::{RenameConfig, RenameConfigBuilder};
pub use error::{DocnameError, FileError};
pub use gemini::{GeminiClient, GeminiError, GeminiModel, VisionModel, DEFAULT_MODEL};
pub use output::{BatchOutput, BatchStats, FileResult};
pub use pipeline::archive::DEFAULT_ARCHIVE_NAME;
pub use progress::{NoopProgressCallback, ProgressCallback, RenameProgressCallback};
