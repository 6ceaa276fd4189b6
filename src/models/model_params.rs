use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::GenerationConfig;

/// Configuration parameters for the generative model
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ModelParams {
    /// Model identifier (e.g., "gemini-2.5-flash-image")
    #[builder(setter(into), default = String::from("gemini-2.5-flash-image"))]
    pub model: String,
    /// Default generation configuration applied when a request carries none.
    #[builder(default)]
    pub generation_config: Option<GenerationConfig>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self::builder().build()
    }
}
