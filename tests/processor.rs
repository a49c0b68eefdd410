//! Behavioural tests for the naming processor's retry loop.
//!
//! These run against a scripted [`VisionModel`] — no network, no pdfium.
//! Timing assertions use Tokio's paused clock so a 65-second back-off
//! costs nothing in wall time while still being measurable.

use async_trait::async_trait;
use docname::pipeline::naming::name_from_png;
use docname::{FileError, GeminiError, RenameConfig, RenameProgressCallback, VisionModel};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

const PNG_STUB: &[u8] = b"not-a-real-png-but-the-mock-does-not-care";

fn quota_error() -> GeminiError {
    GeminiError::Http {
        status: 429,
        message: "Resource has been exhausted (e.g. check quota).".into(),
    }
}

/// Fails with `error` for the first `failures` calls, then answers `answer`.
struct ScriptedModel {
    calls: AtomicU32,
    failures: u32,
    error: GeminiError,
    answer: String,
}

impl ScriptedModel {
    fn new(failures: u32, error: GeminiError, answer: &str) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures,
            error,
            answer: answer.to_string(),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    async fn generate_name(&self, _prompt: &str, _png: &[u8]) -> Result<String, GeminiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(self.error.clone())
        } else {
            Ok(self.answer.clone())
        }
    }
}

/// Counts countdown ticks and remembers the last remaining-seconds value.
#[derive(Default)]
struct CountdownSpy {
    ticks: AtomicU64,
    last_remaining: AtomicU64,
}

impl RenameProgressCallback for CountdownSpy {
    fn on_retry_wait(&self, _name: &str, _attempt: u32, seconds_remaining: u64) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
        self.last_remaining.store(seconds_remaining, Ordering::SeqCst);
    }
}

fn config_with_wait(max_attempts: u32, wait_secs: u64) -> RenameConfig {
    RenameConfig::builder()
        .max_attempts(max_attempts)
        .retry_wait_secs(wait_secs)
        .build()
        .unwrap()
}

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn success_appends_pdf_suffix_exactly_once() {
    let model = ScriptedModel::new(0, quota_error(), "25.03.14_DEC_12_Budget_Signed");
    let config = config_with_wait(5, 65);

    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;

    assert_eq!(
        result.new_name.as_deref(),
        Some("25.03.14_DEC_12_Budget_Signed.pdf")
    );
    assert!(result.error.is_none());
    assert_eq!(result.attempts, 1);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn success_keeps_model_supplied_suffix() {
    let model = ScriptedModel::new(0, quota_error(), "`25.03.14_DEC_12_Budget_Signed.pdf`\n");
    let config = config_with_wait(5, 65);

    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;

    let name = result.new_name.unwrap();
    assert!(name.ends_with(".pdf"));
    assert!(!name.ends_with(".pdf.pdf"));
    assert!(!name.contains('`'));
}

// ── Retry path ───────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn quota_errors_then_success_takes_exactly_n_attempts() {
    // Fails twice, succeeds on the 3rd call; max allows 5.
    let model = ScriptedModel::new(2, quota_error(), "25.01.01_RPT_9_Audit_Signed.pdf");
    let spy = Arc::new(CountdownSpy::default());
    let config = RenameConfig::builder()
        .max_attempts(5)
        .retry_wait_secs(65)
        .progress_callback(spy.clone())
        .build()
        .unwrap();

    let virtual_start = tokio::time::Instant::now();
    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;
    let waited = virtual_start.elapsed();

    assert_eq!(result.attempts, 3);
    assert_eq!(model.calls(), 3);
    assert!(result.error.is_none());
    // Two back-offs of 65 s each, ticked down second by second.
    assert_eq!(waited.as_secs(), 2 * 65);
    assert_eq!(spy.ticks.load(Ordering::SeqCst), 2 * 65);
    assert_eq!(spy.last_remaining.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn persistent_quota_errors_exhaust_retries() {
    let model = ScriptedModel::new(u32::MAX, quota_error(), "never");
    let config = config_with_wait(5, 65);

    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;

    assert_eq!(model.calls(), 5);
    assert_eq!(result.attempts, 5);
    assert_eq!(result.error, Some(FileError::ServerOverloaded { attempts: 5 }));
    assert!(result.new_name.is_none());
}

#[tokio::test(start_paused = true)]
async fn bad_request_is_retried_like_quota() {
    let model = ScriptedModel::new(
        1,
        GeminiError::Http {
            status: 400,
            message: "User location quota exceeded".into(),
        },
        "25.02.02_LTR_3_Reply_Signed.pdf",
    );
    let config = config_with_wait(3, 10);

    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;

    assert_eq!(result.attempts, 2);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn non_retryable_error_is_surfaced_verbatim_after_one_call() {
    let model = ScriptedModel::new(
        u32::MAX,
        GeminiError::Http {
            status: 403,
            message: "API key not valid. Please pass a valid API key.".into(),
        },
        "never",
    );
    let config = config_with_wait(5, 65);

    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;

    assert_eq!(model.calls(), 1);
    assert_eq!(result.attempts, 1);
    match result.error {
        Some(FileError::Api { ref message }) => {
            assert!(message.contains("API key not valid"), "got: {message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn no_wait_after_final_failed_attempt() {
    // With max_attempts = 1 the processor must not sleep at all.
    let model = ScriptedModel::new(u32::MAX, quota_error(), "never");
    let spy = Arc::new(CountdownSpy::default());
    let config = RenameConfig::builder()
        .max_attempts(1)
        .retry_wait_secs(65)
        .progress_callback(spy.clone())
        .build()
        .unwrap();

    let result = name_from_png(&model, "scan.pdf", PNG_STUB, &config).await;

    assert_eq!(model.calls(), 1);
    assert_eq!(result.error, Some(FileError::ServerOverloaded { attempts: 1 }));
    assert_eq!(spy.ticks.load(Ordering::SeqCst), 0);
}
