//! Configuration types for a renaming batch.
//!
//! All batch behaviour is controlled through [`RenameConfig`], built via
//! its [`RenameConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across calls and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::DocnameError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for one renaming batch.
///
/// Built via [`RenameConfig::builder()`] or [`RenameConfig::default()`].
///
/// # Example
/// ```rust
/// use docname::RenameConfig;
///
/// let config = RenameConfig::builder()
///     .dpi(150)
///     .max_attempts(5)
///     .retry_wait_secs(65)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RenameConfig {
    /// Gemini API key. If None, read from the `GEMINI_API_KEY` environment
    /// variable at batch start.
    pub api_key: Option<String>,

    /// Model identifier, e.g. "models/gemini-1.5-flash". If None, the
    /// model selector queries the catalog and picks a vision-capable model.
    pub model: Option<String>,

    /// Rendering DPI for the first page. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps letterheads and stamps sharp enough for the model to
    /// read dates and reference numbers, while the PNG stays well below
    /// API upload limits.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels.
    /// Default: 2000.
    ///
    /// A safety cap independent of DPI: a 150-DPI render of an A0 drawing
    /// would otherwise exhaust memory. Either dimension is capped, the
    /// other scales proportionally.
    pub max_rendered_pixels: u32,

    /// Maximum total attempts per document on a rate-limit error.
    /// Default: 5.
    ///
    /// Only 429/400/quota failures count against this; a non-retryable
    /// provider error terminates the document immediately.
    pub max_attempts: u32,

    /// Fixed wait between attempts, in whole seconds. Default: 65.
    ///
    /// Free-tier Gemini quotas reset per minute, so a flat 65-second pause
    /// is long enough to land in the next window. The wait is surfaced as
    /// a per-second countdown through the progress callback.
    pub retry_wait_secs: u64,

    /// Custom naming instruction. If None, uses
    /// [`crate::prompts::NAMING_PROMPT`].
    pub prompt: Option<String>,

    /// Per-request timeout for model calls in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Progress callback receiving per-file and countdown events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            dpi: 150,
            max_rendered_pixels: 2000,
            max_attempts: 5,
            retry_wait_secs: 65,
            prompt: None,
            api_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenameConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("max_attempts", &self.max_attempts)
            .field("retry_wait_secs", &self.retry_wait_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl RenameConfig {
    /// Create a new builder for `RenameConfig`.
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenameConfig`].
pub struct RenameConfigBuilder {
    config: RenameConfig,
}

impl RenameConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n.max(1);
        self
    }

    pub fn retry_wait_secs(mut self, secs: u64) -> Self {
        self.config.retry_wait_secs = secs;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenameConfig, DocnameError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(DocnameError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.max_attempts == 0 {
            return Err(DocnameError::InvalidConfig(
                "max_attempts must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = RenameConfig::default();
        assert_eq!(c.dpi, 150);
        assert_eq!(c.max_attempts, 5);
        assert_eq!(c.retry_wait_secs, 65);
        assert_eq!(c.max_rendered_pixels, 2000);
        assert!(c.api_key.is_none());
        assert!(c.model.is_none());
    }

    #[test]
    fn builder_clamps_out_of_range_values() {
        let c = RenameConfig::builder()
            .dpi(10)
            .max_attempts(0)
            .max_rendered_pixels(1)
            .build()
            .unwrap();
        assert_eq!(c.dpi, 72);
        assert_eq!(c.max_attempts, 1);
        assert_eq!(c.max_rendered_pixels, 100);
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = RenameConfig::builder().api_key("secret-key").build().unwrap();
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("redacted"));
    }
}
