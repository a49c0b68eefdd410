//! Gemini REST client: model catalog listing and vision completions.
//!
//! The two endpoints this tool needs are small enough that a hand-rolled
//! `reqwest` client with typed `serde` request/response structs is simpler
//! and more debuggable than a provider SDK:
//!
//! * `GET  /v1beta/models` — the catalog, used by the model selector
//! * `POST /v1beta/{model}:generateContent` — one text instruction plus
//!   one inline PNG, answered with a text completion
//!
//! The [`VisionModel`] trait is the seam between the naming processor and
//! the network: production code talks to [`GeminiModel`], tests inject a
//! simulated provider that fails on demand.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fallback model when the catalog lists no vision-capable Gemini model.
pub const DEFAULT_MODEL: &str = "models/gemini-1.5-flash";

/// Substring a catalog entry must carry to be considered.
const VENDOR_MARKER: &str = "gemini";

/// The capability a model must advertise to accept image + text requests.
const GENERATE_METHOD: &str = "generateContent";

// ── Errors ───────────────────────────────────────────────────────────────

/// Errors from a single model call.
#[derive(Debug, Clone, Error)]
pub enum GeminiError {
    /// The API answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced an HTTP response (DNS, TLS, timeout).
    #[error("request failed: {message}")]
    Network { message: String },

    /// The API answered 200 but with no usable candidate text.
    #[error("empty response from model")]
    EmptyResponse,
}

impl GeminiError {
    /// Whether a retry after a back-off pause can plausibly succeed.
    ///
    /// Classification is by HTTP status first: 429 is the rate limiter and
    /// 400 is how the API reports an exhausted free-tier quota mid-billing
    /// cycle. The message check catches quota markers tunnelled through
    /// other transports.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::Http { status, .. } if *status == 429 || *status == 400 => true,
            GeminiError::Http { message, .. } | GeminiError::Network { message } => {
                message.contains("RESOURCE_EXHAUSTED")
                    || message.to_ascii_lowercase().contains("quota")
            }
            GeminiError::EmptyResponse => false,
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelCatalog {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── Trait seam ───────────────────────────────────────────────────────────

/// One text instruction plus one PNG image in, one text completion out.
///
/// The naming processor is generic over this trait so tests can simulate
/// rate limits and hard failures without any network.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate_name(&self, prompt: &str, png: &[u8]) -> Result<String, GeminiError>;
}

// ── Client ───────────────────────────────────────────────────────────────

/// Thin HTTP client holding the key and a configured `reqwest::Client`.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    /// Build a client with the given key and per-request timeout.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Query the model catalog and pick a vision-capable Gemini model.
    ///
    /// Returns `None` on any listing failure — the caller treats that as
    /// an unusable key and stops before processing any document. On
    /// success returns the first entry advertising `generateContent`
    /// whose name contains "gemini", or [`DEFAULT_MODEL`] if none does.
    /// The listing itself is never retried.
    pub async fn select_model(&self) -> Option<String> {
        let url = format!("{API_BASE}/models");
        let response = self
            .http
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!("Model listing failed: HTTP {}", response.status());
            return None;
        }

        let catalog: ModelCatalog = response.json().await.ok()?;
        let chosen = pick_model(&catalog);
        debug!("Selected model: {}", chosen);
        Some(chosen)
    }

    /// Bind the client to a model name, producing a [`VisionModel`].
    pub fn into_model(self, name: impl Into<String>) -> GeminiModel {
        GeminiModel {
            client: self,
            name: name.into(),
        }
    }
}

/// First catalog entry that can generate content and is a Gemini model,
/// else the hardcoded fallback.
pub(crate) fn pick_model(catalog: &ModelCatalog) -> String {
    catalog
        .models
        .iter()
        .find(|m| {
            m.supported_generation_methods
                .iter()
                .any(|method| method == GENERATE_METHOD)
                && m.name.contains(VENDOR_MARKER)
        })
        .map(|m| m.name.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// A [`GeminiClient`] bound to one model identifier.
pub struct GeminiModel {
    client: GeminiClient,
    name: String,
}

impl GeminiModel {
    /// The bound model identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> String {
        // Catalog names already carry the "models/" prefix; accept bare
        // identifiers from --model too.
        if self.name.starts_with("models/") {
            format!("{API_BASE}/{}:generateContent", self.name)
        } else {
            format!("{API_BASE}/models/{}:generateContent", self.name)
        }
    }
}

#[async_trait]
impl VisionModel for GeminiModel {
    async fn generate_name(&self, prompt: &str, png: &[u8]) -> Result<String, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: STANDARD.encode(png),
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.client.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(GeminiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            response.json().await.map_err(|e| GeminiError::Network {
                message: format!("failed to parse response: {e}"),
            })?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse);
        }

        debug!("Model answered {} chars", text.len());
        Ok(text)
    }
}
