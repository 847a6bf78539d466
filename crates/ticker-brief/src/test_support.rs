//! Stub model provider shared by generator and pipeline tests

use async_trait::async_trait;
use brief_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, ModelInfo, StopReason,
    TokenUsage,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Reply {
    Text(String),
    Fail(fn() -> LLMError),
}

/// Provider answering every completion with a fixed reply
pub struct StubProvider {
    reply: Reply,
    models: Vec<ModelInfo>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl StubProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    pub fn failing(error: fn() -> LLMError) -> Self {
        Self::with_reply(Reply::Fail(error))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            models: Vec::new(),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Models returned by discovery
    pub fn with_models(mut self, ids: &[&str]) -> Self {
        self.models = ids.iter().map(|id| ModelInfo::generative(*id)).collect();
        self
    }

    /// Number of completion calls made
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for StubProvider {
    async fn complete(&self, request: CompletionRequest) -> brief_llm::Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        match &self.reply {
            Reply::Text(text) => Ok(CompletionResponse {
                message: Message::assistant(text.clone()),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            }),
            Reply::Fail(error) => Err(error()),
        }
    }

    async fn list_models(&self) -> brief_llm::Result<Vec<ModelInfo>> {
        Ok(self.models.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}
