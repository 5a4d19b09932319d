//! Server-sent event handling for OpenAI-compatible chat completions.
//!
//! Replies are requested with `stream: true` and reassembled here. The rest
//! of the application only ever sees the finished text.

use memchr::memchr;

use crate::api::ChatResponse;
use crate::core::backend::BackendError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SseEvent {
    Chunk(String),
    Error(String),
    Done,
    /// Comments, keep-alives, role-only deltas and other lines without text.
    Ignored,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Interpret one already-trimmed line of the event stream.
pub fn parse_sse_line(line: &str) -> SseEvent {
    let Some(payload) = extract_data_payload(line) else {
        return SseEvent::Ignored;
    };

    if payload == "[DONE]" {
        return SseEvent::Done;
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(SseEvent::Chunk)
            .unwrap_or(SseEvent::Ignored),
        Err(_) if payload.trim().is_empty() => SseEvent::Ignored,
        Err(_) => SseEvent::Error(summarize_api_error(payload)),
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            // Gemini wraps errors in a one-element array.
            value
                .pointer("/0/error/message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// One-line description of an error body, for logs and error values.
pub fn summarize_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
        return json_value.to_string();
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Incrementally reassembles a streamed reply from raw body chunks.
#[derive(Debug, Default)]
pub struct ReplyAccumulator {
    buffer: Vec<u8>,
    text: String,
    done: bool,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a body chunk. Returns `Ok(true)` once `[DONE]` has been seen.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<bool, BackendError> {
        if self.done {
            return Ok(true);
        }
        self.buffer.extend_from_slice(bytes);

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let event = match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(line) => parse_sse_line(line.trim()),
                Err(err) => {
                    tracing::warn!("dropping non UTF-8 stream line: {err}");
                    SseEvent::Ignored
                }
            };
            self.buffer.drain(..=newline_pos);

            match event {
                SseEvent::Chunk(chunk) => self.text.push_str(&chunk),
                SseEvent::Error(message) => return Err(BackendError::Stream(message)),
                SseEvent::Done => {
                    self.done = true;
                    return Ok(true);
                }
                SseEvent::Ignored => {}
            }
        }
        Ok(false)
    }

    /// Finish the stream, flushing a final line that had no trailing newline.
    pub fn finish(mut self) -> Result<String, BackendError> {
        if !self.done && !self.buffer.is_empty() {
            self.buffer.push(b'\n');
            let tail = std::mem::take(&mut self.buffer);
            self.feed(&tail)?;
        }
        Ok(self.text)
    }
}
