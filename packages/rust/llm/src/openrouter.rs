//! OpenRouter adapter speaking the OpenAI-compatible chat-completions API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use brandpitch_shared::{BrandPitchError, OpenRouterConfig};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::port::{ChatRequest, ChatResponse, LlmClient, LlmError, ResponseFormat};

/// User-Agent string for model requests.
const USER_AGENT: &str = concat!("BrandPitch/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in an error message.
const MAX_ERROR_BODY: usize = 500;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Connection settings for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterOptions {
    /// API base, e.g. `https://openrouter.ai/api/v1`.
    pub base_url: String,
    pub api_key: Secret<String>,
    pub timeout_secs: u64,
}

impl OpenRouterOptions {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Secret::new(api_key.into()),
            timeout_secs: 60,
        }
    }

    /// Build from the `[openrouter]` section. A missing key is a config error.
    pub fn from_config(config: &OpenRouterConfig) -> Result<Self, BrandPitchError> {
        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key()?,
            timeout_secs: config.timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a ChatRequest) -> Self {
        Self {
            model: &request.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            response_format: match request.response_format {
                ResponseFormat::JsonObject => Some(WireResponseFormat {
                    format_type: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Chat-completions client for OpenRouter (or any OpenAI-compatible endpoint).
pub struct OpenRouterClient {
    client: Client,
    completions_url: Url,
    api_key: Secret<String>,
    timeout_secs: u64,
}

impl OpenRouterClient {
    /// Create a client. Fails with a config error on a bad base URL.
    pub fn new(options: OpenRouterOptions) -> Result<Self, BrandPitchError> {
        let mut completions_url = Url::parse(&options.base_url).map_err(|e| {
            BrandPitchError::config(format!(
                "invalid model provider URL '{}': {e}",
                options.base_url
            ))
        })?;
        completions_url
            .path_segments_mut()
            .map_err(|_| {
                BrandPitchError::config(format!(
                    "model provider URL cannot be a base: {}",
                    options.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["chat", "completions"]);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| BrandPitchError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            completions_url,
            api_key: options.api_key,
            timeout_secs: options.timeout_secs,
        })
    }

    /// Create a client from the `[openrouter]` config section.
    pub fn from_config(config: &OpenRouterConfig) -> Result<Self, BrandPitchError> {
        Self::new(OpenRouterOptions::from_config(config)?)
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    #[instrument(skip_all, fields(model = %request.model, temperature = request.temperature))]
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let start = Instant::now();
        let body = WireRequest::from_request(&request);

        let response = self
            .client
            .post(self.completions_url.as_str())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(LlmError::Unauthorized);
            }
            let mut text = response.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| text.is_char_boundary(*i))
                    .unwrap_or(0);
                text.truncate(cut);
            }
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        let content = wire
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::Empty)?;

        let (tokens_in, tokens_out) = wire
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            served_by = %wire.model,
            tokens_in,
            tokens_out,
            latency_ms,
            "completion received"
        );

        Ok(ChatResponse {
            content,
            model: if wire.model.is_empty() {
                request.model
            } else {
                wire.model
            },
            tokens_in,
            tokens_out,
            latency_ms,
        })
    }

    fn provider(&self) -> &str {
        "openrouter"
    }
}
