//! Pipeline stages for first-page renaming.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different rendering backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ render ──▶ encode ──▶ naming ──▶ archive
//! (PDF)    (pdfium)    (PNG)     (model)    (ZIP)
//! ```
//!
//! 1. [`render`]  — rasterise the first page; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 2. [`encode`]  — PNG-encode the rendered page for the request body
//! 3. [`naming`]  — drive the model call with the fixed-interval retry
//!    loop; the only stage with network I/O
//! 4. [`archive`] — bundle successes into one in-memory ZIP

pub mod archive;
pub mod encode;
pub mod naming;
pub mod render;
