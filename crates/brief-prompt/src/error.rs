//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur while building or rendering prompts
#[derive(Error, Debug)]
pub enum PromptError {
    /// Template not available in the requested language
    #[error("Template '{name}' has no '{language}' variant")]
    LanguageNotAvailable { name: String, language: String },

    /// Template parsing failed
    #[error("Failed to parse template '{name}' ({language}): {detail}")]
    TemplateParseFailed {
        name: String,
        language: String,
        detail: String,
    },

    /// Template rendering failed
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// Builder finished without any variant
    #[error("No templates provided for '{0}'")]
    NoTemplatesProvided(String),

    /// Template has no variant at all to fall back to
    #[error("No language available for template '{0}'")]
    NoLanguageAvailable(String),
}
