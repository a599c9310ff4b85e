//! Scripted language-model double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use brandpitch_llm::{ChatRequest, ChatResponse, LlmClient, LlmError};

/// Replays queued answers in order and records every request it receives.
pub(crate) struct ScriptedLlm {
    answers: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub(crate) fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful answer.
    pub(crate) fn answer(self, content: impl Into<String>) -> Self {
        self.answers.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Queue a failure.
    pub(crate) fn fail(self, error: LlmError) -> Self {
        self.answers.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        let content = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedLlm ran out of answers"))?;
        Ok(ChatResponse {
            content,
            model,
            ..Default::default()
        })
    }

    fn provider(&self) -> &str {
        "scripted"
    }
}
