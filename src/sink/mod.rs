//! Routes streamed response parts to the console and to files on disk.
//!
//! Text parts are echoed to the output writer, inline binary parts are
//! decoded and saved under a collision-resistant file name. One part is
//! fully handled before the next is looked at, so a write failure for one
//! image never costs the rest of the stream.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use futures::{pin_mut, Stream, StreamExt};
use uuid::Uuid;

use crate::models::{InlineData, Part, Response};

/// Resolves the file extension for a media type, dot included.
///
/// Unrecognized media types degrade to an empty extension rather than an
/// error, so `image_file_name` always produces a usable name.
pub fn extension_for(media_type: &str) -> String {
    mime_guess::get_mime_extensions_str(media_type)
        .and_then(|extensions| extensions.first())
        .map(|extension| format!(".{}", extension))
        .unwrap_or_default()
}

/// Builds a fresh file name for an image payload of the given media type.
///
/// The name combines the local wall-clock time at second precision with a
/// random v4 UUID, so two images produced within the same second still get
/// distinct names.
pub fn image_file_name(media_type: &str) -> String {
    format!(
        "image_{}_{}{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        Uuid::new_v4(),
        extension_for(media_type)
    )
}

/// Writes the payload bytes to `path`, creating or truncating the file.
pub fn save_binary_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)
}

/// Consumes a stream of response chunks and materializes their parts.
///
/// The writers are generic so tests can capture console output; the real
/// binary uses [`ResponseSink::stdio`].
pub struct ResponseSink<O, E> {
    out: O,
    err: E,
    dir: PathBuf,
}

impl ResponseSink<io::Stdout, io::Stderr> {
    /// A sink writing to the process stdio, saving files in the current
    /// working directory.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr(), PathBuf::from("."))
    }
}

impl<O: Write, E: Write> ResponseSink<O, E> {
    /// Creates a sink with explicit writers and target directory.
    pub fn new(out: O, err: E, dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            err,
            dir: dir.into(),
        }
    }

    /// Consumes the sink, handing back its writers.
    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Drains the stream, routing every chunk in arrival order.
    ///
    /// Each chunk is fully processed, file writes included, before the next
    /// one is polled. A stream-level error is reported to the error writer
    /// and stops consumption; files written so far stay on disk.
    pub async fn consume<S, SE>(&mut self, stream: S)
    where
        S: Stream<Item = Result<Response, SE>>,
        SE: fmt::Display,
    {
        pin_mut!(stream);
        while let Some(item) = stream.next().await {
            match item {
                Ok(response) => self.handle_response(&response),
                Err(e) => {
                    writeln!(self.err, "Error during content generation: {}", e).ok();
                    return;
                }
            }
        }
    }

    /// Routes the parts of one chunk's first candidate.
    ///
    /// Chunks without a candidate, content or parts are skipped silently.
    pub fn handle_response(&mut self, response: &Response) {
        let Some(parts) = response.first_candidate_parts() else {
            return;
        };
        for part in parts {
            self.handle_part(part);
        }
    }

    fn handle_part(&mut self, part: &Part) {
        match part {
            Part::InlineData { inline_data } => self.write_binary(inline_data),
            Part::Text { text } if !text.is_empty() => {
                writeln!(self.out, "{}", text).ok();
            }
            _ => {}
        }
    }

    fn write_binary(&mut self, inline_data: &InlineData) {
        let bytes = match inline_data.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                writeln!(self.err, "Error decoding image data: {}", e).ok();
                return;
            }
        };
        let file_name = image_file_name(inline_data.media_type());
        match save_binary_file(&self.dir.join(&file_name), &bytes) {
            Ok(()) => {
                writeln!(self.out, "Saved file: {}", file_name).ok();
            }
            Err(e) => {
                writeln!(self.err, "Error saving file: {}", e).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use std::collections::HashSet;

    fn text_chunk(texts: &[&str]) -> Response {
        chunk_json(serde_json::json!({
            "candidates": [{"content": {"parts":
                texts.iter().map(|t| serde_json::json!({"text": t})).collect::<Vec<_>>()
            }}]
        }))
    }

    fn image_chunk(mime_type: &str, bytes: &[u8]) -> Response {
        chunk_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"inlineData": {
                "mimeType": mime_type,
                "data": STANDARD.encode(bytes),
            }}]}}]
        }))
    }

    fn chunk_json(value: serde_json::Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    fn test_sink(dir: &Path) -> ResponseSink<Vec<u8>, Vec<u8>> {
        ResponseSink::new(Vec::new(), Vec::new(), dir)
    }

    #[test]
    fn png_media_type_gets_png_extension() {
        assert_eq!(extension_for("image/png"), ".png");
    }

    #[test]
    fn unrecognized_media_type_gets_no_extension() {
        assert_eq!(extension_for("not/a-real-type"), "");
        assert_eq!(extension_for("garbage"), "");
    }

    #[test]
    fn file_names_follow_the_timestamp_uuid_pattern() {
        let name = image_file_name("image/png");
        let pattern = regex::Regex::new(
            r"^image_\d{8}_\d{6}_[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}\.png$",
        )
        .unwrap();
        assert!(pattern.is_match(&name), "unexpected name: {}", name);
    }

    #[test]
    fn file_names_never_collide_within_a_second() {
        let names: HashSet<_> = (0..1000).map(|_| image_file_name("image/png")).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn text_parts_are_printed_in_order_with_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&text_chunk(&["first", "second"]));
        sink.handle_response(&text_chunk(&["third"]));
        assert_eq!(
            String::from_utf8(sink.out).unwrap(),
            "first\nsecond\nthird\n"
        );
        assert!(sink.err.is_empty());
    }

    #[test]
    fn empty_text_parts_print_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&text_chunk(&[""]));
        assert!(sink.out.is_empty());
    }

    #[test]
    fn binary_parts_land_on_disk_byte_exact() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        let payload = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];
        sink.handle_response(&image_chunk("image/png", &payload));

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read(&entries[0]).unwrap(), payload);

        let stdout = String::from_utf8(sink.out).unwrap();
        let file_name = entries[0].file_name().unwrap().to_str().unwrap();
        assert_eq!(stdout, format!("Saved file: {}\n", file_name));
    }

    #[test]
    fn one_file_per_binary_part() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        for i in 0..5u8 {
            sink.handle_response(&image_chunk("image/png", &[i]));
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 5);
    }

    #[test]
    fn mixed_parts_route_in_arrival_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&chunk_json(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"text": "caption"},
                {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode([7u8])}},
            ]}}]
        })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        let stdout = String::from_utf8(sink.out).unwrap();
        assert!(stdout.starts_with("caption\nSaved file: image_"));
    }

    #[test]
    fn chunks_without_candidates_or_content_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&chunk_json(serde_json::json!({})));
        sink.handle_response(&chunk_json(serde_json::json!({"candidates": []})));
        sink.handle_response(&chunk_json(serde_json::json!({"candidates": [{}]})));
        sink.handle_response(&text_chunk(&["still alive"]));
        assert_eq!(String::from_utf8(sink.out).unwrap(), "still alive\n");
        assert!(sink.err.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn only_the_first_candidate_is_routed() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&chunk_json(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "kept"}]}},
                {"content": {"parts": [{"text": "dropped"}]}},
            ]
        })));
        assert_eq!(String::from_utf8(sink.out).unwrap(), "kept\n");
    }

    #[test]
    fn unknown_part_kinds_produce_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&chunk_json(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"functionCall": {"name": "f", "args": {}}},
            ]}}]
        })));
        assert!(sink.out.is_empty());
        assert!(sink.err.is_empty());
    }

    #[test]
    fn a_failed_write_is_reported_and_processing_continues() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let mut sink = ResponseSink::new(Vec::new(), Vec::new(), &missing);
        sink.handle_response(&image_chunk("image/png", &[1]));
        sink.handle_response(&text_chunk(&["after the failure"]));

        let stderr = String::from_utf8(sink.err).unwrap();
        assert!(stderr.starts_with("Error saving file: "), "{}", stderr);
        assert_eq!(
            String::from_utf8(sink.out).unwrap(),
            "after the failure\n"
        );
    }

    #[test]
    fn a_corrupt_payload_is_reported_and_processing_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        sink.handle_response(&chunk_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"inlineData": {
                "mimeType": "image/png",
                "data": "@@not base64@@",
            }}]}}]
        })));
        sink.handle_response(&text_chunk(&["next part"]));

        let stderr = String::from_utf8(sink.err).unwrap();
        assert!(stderr.starts_with("Error decoding image data: "), "{}", stderr);
        assert_eq!(String::from_utf8(sink.out).unwrap(), "next part\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn a_stream_error_stops_consumption() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        let stream = futures::stream::iter(vec![
            Ok(text_chunk(&["before"])),
            Err(crate::GeminiError::new("connection reset")),
            Ok(text_chunk(&["after"])),
        ]);
        sink.consume(stream).await;

        assert_eq!(String::from_utf8(sink.out).unwrap(), "before\n");
        assert_eq!(
            String::from_utf8(sink.err).unwrap(),
            "Error during content generation: [Gemini Error]: connection reset\n"
        );
    }

    #[tokio::test]
    async fn an_exhausted_stream_ends_consumption_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = test_sink(dir.path());
        let chunks: Vec<Result<Response, crate::GeminiError>> =
            vec![Ok(text_chunk(&["only"]))];
        sink.consume(futures::stream::iter(chunks)).await;
        assert_eq!(String::from_utf8(sink.out).unwrap(), "only\n");
        assert!(sink.err.is_empty());
    }
}
