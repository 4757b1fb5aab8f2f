//! Messages API request and reply shapes.

use fitcheck_core::{CompletionRequest, CompletionResponse, UpstreamFailure, Usage};
use serde::Serialize;
use serde_json::Value;

/// Longest raw body kept as a failure message.
const MAX_RAW_MESSAGE_CHARS: usize = 500;

/// Body of `POST /v1/messages`.
#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a CompletionRequest> for MessagesRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        }
    }
}

/// Reads the parts of a success reply the pipeline uses.
///
/// The text is taken from the first content block only; a missing or empty
/// text there yields `None`.
pub(crate) fn parse_reply(body: &Value) -> CompletionResponse {
    let text = body
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned);

    let usage = body
        .get("usage")
        .and_then(|usage| serde_json::from_value::<Usage>(usage.clone()).ok());

    CompletionResponse {
        text,
        model: string_field(body, "model"),
        stop_reason: string_field(body, "stop_reason"),
        usage,
    }
}

/// Builds the failure description for a non-success reply.
pub(crate) fn parse_failure(status: u16, body: &str) -> UpstreamFailure {
    let mut failure = UpstreamFailure::with_status(status);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                failure = failure.with_message(message);
            }
            if let Some(error) = map.get("error") {
                if let Some(message) = string_field(error, "message") {
                    failure = failure.with_nested_message(message);
                }
                if let Some(code) = string_field(error, "type") {
                    failure = failure.with_code(code);
                }
            }
        }
        _ if !body.trim().is_empty() => {
            failure = failure.with_message(truncate(body.trim(), MAX_RAW_MESSAGE_CHARS));
        }
        _ => {}
    }

    failure
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
