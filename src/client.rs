//! Client implementation for the Gemini API.

use futures::StreamExt;
use tokio::sync::mpsc;

use crate::{
    error::GeminiError,
    models::{ModelParams, Request, ResponseStream},
};

/// Default API endpoint for Google's Generative AI service
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default API version
const DEFAULT_API_VERSION: &str = "v1beta";
/// Default channel buffer size for streaming responses
const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 16;

/// A client for the Gemini `generateContent` family of endpoints.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    api_key: String,
    params: ModelParams,
    client: reqwest::Client,
}

impl GenerativeModel {
    /// Creates a new GenerativeModel with the specified API key and model.
    pub fn new(api_key: impl Into<String>, params: impl Into<ModelParams>) -> Self {
        Self {
            api_key: api_key.into(),
            params: params.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a new GenerativeModel from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `GEMINI_API_KEY` - The API key for authentication
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::MissingApiKey`] if the variable is unset or
    /// empty, before any network resource is touched.
    pub fn from_env(model: impl Into<String>) -> Result<Self, GeminiError> {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        Ok(Self::new(
            api_key,
            ModelParams::builder().model(model).build(),
        ))
    }

    /// The `streamGenerateContent` URL for the configured model. This tool
    /// only ever streams, so no other endpoint is addressed.
    fn build_url(&self) -> String {
        format!(
            "{}/{}/models/{}:streamGenerateContent?key={}",
            DEFAULT_BASE_URL, DEFAULT_API_VERSION, self.params.model, self.api_key
        )
    }

    /// Sends the request and checks the response status.
    async fn make_request(
        &self,
        url: &str,
        mut request: Request,
    ) -> Result<reqwest::Response, GeminiError> {
        request.generation_config = request
            .generation_config
            .or_else(|| self.params.generation_config.clone());

        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(format!(
                "Request failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(response)
    }

    /// Generates streaming content using the Gemini API.
    ///
    /// The endpoint replies with a JSON array of response objects spread over
    /// the HTTP body; each complete object is parsed and yielded as soon as
    /// its closing brace arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself fails; mid-stream failures are
    /// yielded as `Err` items of the returned stream.
    pub async fn stream_generate_content(
        &self,
        request: impl Into<Request>,
    ) -> Result<ResponseStream, GeminiError> {
        let url = self.build_url();
        let response = self.make_request(&url, request.into()).await?;

        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_BUFFER_SIZE);
        let mut body = response.bytes_stream();

        tokio::spawn(async move {
            let mut scanner = JsonObjectScanner::default();
            // Bytes held back until the rest of a split UTF-8 sequence arrives.
            let mut pending = Vec::new();

            while let Some(chunk_result) = body.next().await {
                let chunk = match chunk_result {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(Err(GeminiError::new(e.to_string()))).await;
                        return;
                    }
                };

                pending.extend_from_slice(&chunk);
                let text = match std::str::from_utf8(&pending) {
                    Ok(text) => {
                        let text = text.to_owned();
                        pending.clear();
                        text
                    }
                    Err(e) if e.error_len().is_none() => {
                        let valid = e.valid_up_to();
                        let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
                        pending.drain(..valid);
                        text
                    }
                    Err(e) => {
                        let _ = tx
                            .send(Err(GeminiError::new(format!("UTF-8 decode error: {}", e))))
                            .await;
                        return;
                    }
                };

                for object in scanner.push(&text) {
                    let item = serde_json::from_str(&object).map_err(|e| {
                        GeminiError::new(format!("Failed to parse response: {}", e))
                    });
                    if tx.send(item).await.is_err() {
                        return;
                    }
                }
            }
        });

        Ok(ResponseStream::new(rx))
    }
}

/// Incremental splitter for a streamed JSON array of objects.
///
/// Feeds on arbitrary text fragments and returns each complete top-level
/// object as soon as its closing brace has been seen. Array brackets, commas
/// and whitespace between objects are discarded; braces and brackets inside
/// string literals (including escaped quotes) do not affect nesting.
#[derive(Debug, Default)]
struct JsonObjectScanner {
    buffer: String,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl JsonObjectScanner {
    /// Consumes a fragment and returns the objects it completed.
    fn push(&mut self, input: &str) -> Vec<String> {
        let mut complete = Vec::new();
        for c in input.chars() {
            if self.depth == 0 {
                // Between objects only an opening brace is meaningful.
                if c == '{' {
                    self.buffer.clear();
                    self.buffer.push(c);
                    self.depth = 1;
                }
                continue;
            }

            self.buffer.push(c);
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == '"' {
                    self.in_string = false;
                }
                continue;
            }

            match c {
                '"' => self.in_string = true,
                '{' => self.depth += 1,
                '}' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        complete.push(std::mem::take(&mut self.buffer));
                    }
                }
                _ => {}
            }
        }
        complete
    }
}
