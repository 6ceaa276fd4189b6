//! Request models for the Gemini API.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::{Part, SystemInstruction};

/// A `generateContent` / `streamGenerateContent` request body.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct Request {
    /// Optional system instruction for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub system_instruction: Option<SystemInstruction>,
    /// Optional generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub generation_config: Option<GenerationConfig>,
    /// The conversation contents, in order.
    pub contents: Vec<Content>,
}

/// An ordered collection of parts making up one conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role that produced this content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts that make up the content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Creates a user turn holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some(Role::User),
            parts: vec![Part::text(text)],
        }
    }
}

/// The author of a piece of content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Content authored by the end user.
    User,
    /// Content authored by the model.
    Model,
    /// Content carrying system-level instructions.
    System,
}

/// Generation parameters sent alongside the contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub top_p: Option<f32>,
    /// Top-k sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub top_k: Option<i32>,
    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub max_output_tokens: Option<i32>,
    /// The kinds of output the model may return.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub response_modalities: Option<Vec<ResponseModality>>,
}

/// A kind of output the model may be asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseModality {
    /// Plain text output.
    Text,
    /// Inline image output.
    Image,
}
