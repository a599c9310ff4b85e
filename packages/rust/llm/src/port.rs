//! Chat-completion port.
//!
//! Both model calls in the pipeline (classification and copy generation) are
//! single stateless request/response exchanges: one system prompt, one user
//! prompt, one answer. There is no conversation state to carry between calls.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free text.
    Text,
    /// The provider must constrain output to a single JSON object.
    JsonObject,
}

/// One chat-completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier passed through to the provider.
    pub model: String,
    /// Instructions and reference data.
    pub system: String,
    /// The facts the answer is about.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f64,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// A JSON-object request, the only kind the pipeline issues.
    pub fn json(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature,
            response_format: ResponseFormat::JsonObject,
        }
    }
}

/// The model's answer plus accounting.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Raw assistant message content.
    pub content: String,
    /// Model that actually served the request.
    pub model: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single chat-completion exchange.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The provider rejected the credential (HTTP 401).
    #[error("credential rejected by model provider")]
    Unauthorized,

    /// Any other non-2xx status.
    #[error("model provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("model request timed out after {0}s")]
    Timeout(u64),

    /// Connection or protocol failure.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The provider answered, but not in the chat-completions shape.
    #[error("malformed model response: {0}")]
    Decode(String),

    /// The provider answered with no message content.
    #[error("model returned an empty response")]
    Empty,
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// A chat-completion backend.
///
/// Implementations make exactly one provider call per [`complete`] and never
/// retry; the pipeline surfaces failures to its caller instead.
///
/// [`complete`]: LlmClient::complete
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Provider name for tracing.
    fn provider(&self) -> &str;
}
