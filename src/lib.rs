#![deny(missing_docs)]

//! A small client for the Google Gemini image generation API.
//!
//! The crate streams `streamGenerateContent` responses, prints any text the
//! model returns and saves inline image data to uniquely named files on disk.

pub mod client;
pub mod error;
pub mod models;
pub mod sink;

pub use client::GenerativeModel;
pub use error::GeminiError;
pub use sink::ResponseSink;
