//! Language-model access for BrandPitch.
//!
//! This crate provides:
//! - [`LlmClient`]: the stateless chat-completion port the pipeline calls
//! - [`OpenRouterClient`]: the production adapter (OpenAI-compatible wire format)
//! - [`parse_json_payload`]: recovery of a JSON object from model output

pub mod json;
pub mod openrouter;
pub mod port;

pub use json::parse_json_payload;
pub use openrouter::{OpenRouterClient, OpenRouterOptions};
pub use port::{ChatRequest, ChatResponse, LlmClient, LlmError, ResponseFormat};
