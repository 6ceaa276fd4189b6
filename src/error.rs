//! Error types for the Gemini image generation client.

use thiserror::Error;

/// Errors that can occur when talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Base error carrying a plain message.
    #[error("[Gemini Error]: {message}")]
    Base {
        /// Error message
        message: String,
    },

    /// The `GEMINI_API_KEY` environment variable is missing or empty.
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    /// Error occurred during an API request.
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error occurred when parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GeminiError {
    /// Creates a new Base error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Base {
            message: message.into(),
        }
    }
}
