//! Text-generation provider abstraction for ticker-brief
//!
//! This crate provides:
//!
//! - Message and completion request/response types
//! - The [`LLMProvider`] trait, including model discovery
//! - [`ModelSelector`], which picks a model from a discovered list by a
//!   prioritized list of name predicates
//! - The Gemini provider (behind the `gemini` feature, on by default)

pub mod completion;
pub mod error;
pub mod messages;
pub mod models;
pub mod provider;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use models::{ModelInfo, ModelPreference, ModelSelector};
pub use provider::LLMProvider;

#[cfg(feature = "gemini")]
pub mod providers;
