//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, LLMError, ModelInfo, Result};
use async_trait::async_trait;

/// A remote text-generation service
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion
    ///
    /// # Arguments
    ///
    /// * `request` - Model, messages and sampling parameters
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// List the models the current credentials can use
    ///
    /// Providers without a discovery endpoint keep the default, which
    /// reports discovery as unsupported.
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Err(LLMError::DiscoveryUnsupported(self.name().to_string()))
    }

    /// Provider name (e.g. "gemini")
    fn name(&self) -> &str;
}
