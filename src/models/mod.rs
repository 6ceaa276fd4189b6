//! Data structures for Gemini API requests and responses.

mod model_params;
mod part;
mod request;
mod response;
mod stream;
mod system_instruction;

pub use model_params::ModelParams;
pub use part::{InlineData, Part};
pub use request::{Content, GenerationConfig, Request, ResponseModality, Role};
pub use response::{Candidate, FinishReason, Response, UsageMetadata};
pub use stream::ResponseStream;
pub use system_instruction::SystemInstruction;
