//! Model discovery and selection
//!
//! Which models an API key may use varies by account tier, so instead of a
//! hard-coded model name the caller can list the available models and let a
//! [`ModelSelector`] pick one. The selector walks its preferences in order
//! and returns the first generation-capable model matching the current one.

use crate::{LLMError, LLMProvider, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A model reported by a provider's discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier to pass back in [`crate::CompletionRequest::model`]
    pub id: String,

    /// Human-readable name, if the provider has one
    pub display_name: Option<String>,

    /// Whether the model accepts text-generation requests
    pub supports_generation: bool,
}

impl ModelInfo {
    /// A generation-capable model with no display name
    pub fn generative(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            supports_generation: true,
        }
    }
}

/// One rule in a selector's priority list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelPreference {
    /// Model id contains this substring (case-insensitive)
    NameContains(String),
    /// Any generation-capable model
    Any,
}

impl ModelPreference {
    fn matches(&self, model: &ModelInfo) -> bool {
        match self {
            ModelPreference::NameContains(needle) => model
                .id
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            ModelPreference::Any => true,
        }
    }
}

/// Picks a model from a discovered list by prioritized predicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelector {
    preferences: Vec<ModelPreference>,
}

impl Default for ModelSelector {
    /// Prefer a fast "flash" model, then a general "pro" model, then anything
    fn default() -> Self {
        Self::from_substrings(["flash", "pro"])
    }
}

impl ModelSelector {
    /// Selector with an explicit preference list
    pub fn new(preferences: Vec<ModelPreference>) -> Self {
        Self { preferences }
    }

    /// Prefer models containing each substring in order, then any model
    pub fn from_substrings<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut preferences: Vec<ModelPreference> = substrings
            .into_iter()
            .map(|s| ModelPreference::NameContains(s.into()))
            .collect();
        preferences.push(ModelPreference::Any);
        Self { preferences }
    }

    /// The preference list
    pub fn preferences(&self) -> &[ModelPreference] {
        &self.preferences
    }

    /// Pick the first candidate matching the highest-priority preference
    ///
    /// Models that cannot generate text are never candidates.
    pub fn select<'a>(&self, models: &'a [ModelInfo]) -> Result<&'a ModelInfo> {
        let candidates: Vec<&ModelInfo> =
            models.iter().filter(|m| m.supports_generation).collect();

        self.preferences
            .iter()
            .find_map(|pref| candidates.iter().copied().find(|m| pref.matches(m)))
            .ok_or(LLMError::NoModelAvailable {
                candidates: candidates.len(),
            })
    }

    /// List the provider's models and select one, returning its id
    pub async fn discover(&self, provider: &dyn LLMProvider) -> Result<String> {
        let models = provider.list_models().await?;
        debug!(
            provider = provider.name(),
            count = models.len(),
            "Discovered models"
        );
        self.select(&models).map(|m| m.id.clone())
    }
}
