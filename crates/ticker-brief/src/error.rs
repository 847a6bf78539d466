//! Error types for ticker-brief

use thiserror::Error;

/// Errors raised inside the pipeline components
///
/// Only configuration and input errors reach the caller as errors. Search
/// failures are skipped and generation failures are turned into a
/// [`crate::Report`] with [`crate::ReportKind::Failed`].
#[derive(Debug, Error)]
pub enum BriefError {
    /// A required API key was not supplied
    #[error("Missing {name}: set {env_var} or pass it on the command line")]
    MissingCredential {
        name: &'static str,
        env_var: &'static str,
    },

    /// User input could not be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Remote API answered with an error
    #[error("API error: {0}")]
    ApiError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File system error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Text-generation error
    #[error(transparent)]
    Llm(#[from] brief_llm::LLMError),

    /// Prompt rendering error
    #[error(transparent)]
    Prompt(#[from] brief_prompt::PromptError),
}

/// Result type alias for ticker-brief operations
pub type Result<T> = std::result::Result<T, BriefError>;
