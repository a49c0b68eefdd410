//! The naming processor: one document in, one [`FileResult`] out.
//!
//! This module owns the retry loop. The policy is deliberately a *fixed*
//! interval rather than exponential backoff: free-tier Gemini quotas
//! reset on a per-minute window, so waiting slightly past a minute is the
//! shortest pause that reliably lands in the next window, and there is
//! exactly one in-flight request at a time so thundering-herd concerns do
//! not apply. The wait is surfaced second by second through the progress
//! callback so an interactive caller can show a countdown.
//!
//! ## Return Value
//!
//! Always returns a `FileResult` — never propagates an error upward, so
//! one bad document cannot abort the batch. Callers check
//! `result.error` to decide how to present the outcome.

use crate::config::RenameConfig;
use crate::error::FileError;
use crate::gemini::VisionModel;
use crate::output::FileResult;
use crate::pipeline::{encode, render};
use crate::prompts::NAMING_PROMPT;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// Compute a convention-compliant name for one document.
///
/// Steps:
/// 1. Rasterise page 1; an unreadable document fails immediately with
///    zero model calls.
/// 2. Send the naming prompt plus the page PNG to the model
///    (see [`name_from_png`] for the retry loop).
pub async fn name_document(
    model: &dyn VisionModel,
    original_name: &str,
    bytes: Vec<u8>,
    config: &RenameConfig,
) -> FileResult {
    let start = Instant::now();

    let image = match render::render_first_page(bytes, config.dpi, config.max_rendered_pixels).await
    {
        Ok(img) => img,
        Err(e) => return failure(original_name, e, 0, start),
    };

    let png = match encode::encode_png(&image) {
        Ok(png) => png,
        Err(e) => {
            warn!("{}: PNG encoding failed: {}", original_name, e);
            return failure(original_name, FileError::UnreadablePdf, 0, start);
        }
    };
    drop(image);

    let mut result = name_from_png(model, original_name, &png, config).await;
    // Charge rendering time to the document as well.
    result.duration_ms = start.elapsed().as_millis() as u64;
    result
}

/// Ask the model to name an already-rasterised first page.
///
/// On success, the answer is sanitised into a filename ending in `.pdf`.
/// On a rate-limit error (HTTP 429/400 or a quota marker), the processor
/// waits out the fixed interval — visible as a per-second countdown — and
/// retries, up to `config.max_attempts`; after exhaustion it reports the
/// fixed overloaded error. Any other error is terminal and surfaced
/// verbatim.
pub async fn name_from_png(
    model: &dyn VisionModel,
    original_name: &str,
    png: &[u8],
    config: &RenameConfig,
) -> FileResult {
    let start = Instant::now();
    let prompt = config.prompt.as_deref().unwrap_or(NAMING_PROMPT);

    for attempt in 1..=config.max_attempts {
        match model.generate_name(prompt, png).await {
            Ok(raw) => {
                let new_name = sanitize_name(&raw);
                debug!(
                    "{}: named '{}' on attempt {}",
                    original_name, new_name, attempt
                );
                return FileResult {
                    original_name: original_name.to_string(),
                    new_name: Some(new_name),
                    error: None,
                    attempts: attempt,
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
            Err(e) if e.is_retryable() => {
                warn!(
                    "{}: attempt {}/{} rate-limited — {}",
                    original_name, attempt, config.max_attempts, e
                );
                if attempt < config.max_attempts {
                    countdown_wait(config, original_name, attempt).await;
                }
            }
            Err(e) => {
                warn!(
                    "{}: attempt {} failed terminally — {}",
                    original_name, attempt, e
                );
                return failure(
                    original_name,
                    FileError::Api {
                        message: e.to_string(),
                    },
                    attempt,
                    start,
                );
            }
        }
    }

    failure(
        original_name,
        FileError::ServerOverloaded {
            attempts: config.max_attempts,
        },
        config.max_attempts,
        start,
    )
}

/// Sleep out the fixed back-off, ticking the callback once per second.
async fn countdown_wait(config: &RenameConfig, original_name: &str, attempt: u32) {
    for remaining in (1..=config.retry_wait_secs).rev() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_retry_wait(original_name, attempt, remaining);
        }
        sleep(Duration::from_secs(1)).await;
    }
}

fn failure(original_name: &str, error: FileError, attempts: u32, start: Instant) -> FileResult {
    FileResult {
        original_name: original_name.to_string(),
        new_name: None,
        error: Some(error),
        attempts,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Turn a raw model answer into a usable filename.
///
/// Models occasionally wrap the answer in backticks or add a trailing
/// explanation line; only the first line survives. Path separators are
/// replaced so the name is safe as a ZIP entry and on disk, and the
/// `.pdf` suffix is appended unless already present (case-insensitive),
/// so the result ends in `.pdf` exactly once.
pub fn sanitize_name(raw: &str) -> String {
    let first_line = raw.trim().lines().next().unwrap_or("");
    let mut name = first_line.replace('`', "").trim().replace(['/', '\\'], "-");
    if !name.to_ascii_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_pdf_suffix_when_missing() {
        assert_eq!(
            sanitize_name("25.03.14_DEC_12-ABC_Budget_Signed"),
            "25.03.14_DEC_12-ABC_Budget_Signed.pdf"
        );
    }

    #[test]
    fn keeps_existing_suffix_exactly_once() {
        assert_eq!(
            sanitize_name("25.03.14_DEC_12-ABC_Budget_Signed.pdf"),
            "25.03.14_DEC_12-ABC_Budget_Signed.pdf"
        );
        assert_eq!(sanitize_name("report.PDF"), "report.PDF");
    }

    #[test]
    fn strips_backticks_and_whitespace() {
        assert_eq!(
            sanitize_name("  `25.01.02_MEMO_7_Hiring_Signed.pdf`  "),
            "25.01.02_MEMO_7_Hiring_Signed.pdf"
        );
    }

    #[test]
    fn keeps_only_first_line() {
        assert_eq!(
            sanitize_name("25.01.02_MEMO_7_Hiring_Signed.pdf\nHere is the filename you asked for."),
            "25.01.02_MEMO_7_Hiring_Signed.pdf"
        );
    }

    #[test]
    fn replaces_path_separators() {
        assert_eq!(
            sanitize_name("25.01.02_DEC_125/UBND_Road_Signed"),
            "25.01.02_DEC_125-UBND_Road_Signed.pdf"
        );
    }
}
