//! Common part model used in both requests and responses.

use base64::{engine::general_purpose::STANDARD, DecodeError, Engine};
use serde::{Deserialize, Serialize};

/// The smallest unit of content exchanged with the model.
///
/// Variant order matters: inline data is tried before text, so a part that
/// somehow carries both is treated as binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A part carrying an embedded binary payload.
    InlineData {
        /// The inline data content of the part
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// A text part containing a string value
    Text {
        /// The text content of the part
        text: String,
    },
    /// A part kind this crate does not model (function calls, file data, ...).
    Unknown(serde_json::Value),
}

impl Part {
    /// Creates a text part from anything string-like.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// A binary payload embedded directly in a response, plus its media type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// The MIME type of the data, e.g. `image/png`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// The payload, base64 encoded as on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl InlineData {
    /// The declared media type, falling back to a generic octet stream.
    pub fn media_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("application/octet-stream")
    }

    /// Decodes the base64 payload. An absent payload decodes to empty bytes.
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        match &self.data {
            Some(data) => STANDARD.decode(data),
            None => Ok(Vec::new()),
        }
    }
}
