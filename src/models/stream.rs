use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::Stream;

use crate::error::GeminiError;

use super::Response;

/// A stream of response chunks backed by the HTTP reader task.
///
/// Dropping the stream closes the receiving end, which stops the reader task
/// and releases the underlying connection.
pub struct ResponseStream {
    receiver: tokio::sync::mpsc::Receiver<Result<Response, GeminiError>>,
}

impl ResponseStream {
    /// Creates a new ResponseStream
    pub fn new(receiver: tokio::sync::mpsc::Receiver<Result<Response, GeminiError>>) -> Self {
        Self { receiver }
    }
}

impl Stream for ResponseStream {
    type Item = Result<Response, GeminiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
