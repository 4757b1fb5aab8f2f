//! Reply extraction and normalization.
//!
//! Model replies are untrusted and only loosely structured. They are turned
//! into an [`AssessmentResult`] in two pure stages:
//!
//! 1. [`extract_json_object`] finds the span from the first `{` to the last
//!    `}` and parses it as a JSON object.
//! 2. [`normalize`] defaults each field independently.
//!
//! When the first stage fails, [`fallback`] builds a generic result
//! from the raw text instead.

use serde_json::{Map, Value};

use super::{AssessmentResult, Recommendation, TRACING_TARGET};

/// Reasoning used when the reply omits it.
pub const DEFAULT_REASONING: &str =
    "Evaluation completed. Please review the considerations and next steps.";

/// Number of characters of the raw reply kept in fallback reasoning.
pub const FALLBACK_EXCERPT_CHARS: usize = 200;

/// Considerations used when the reply cannot be parsed.
pub const FALLBACK_CONSIDERATIONS: [&str; 4] = [
    "Use case compatibility needs further evaluation",
    "Scale requirements should be validated with testing",
    "Cost analysis recommended",
    "Compliance requirements need verification",
];

/// Next steps used when the reply cannot be parsed.
pub const FALLBACK_NEXT_STEPS: [&str; 3] = [
    "Review Claude API documentation for your specific use case",
    "Run a pilot test with a small subset of your workload",
    "Contact Anthropic sales for enterprise requirements",
];

/// Why a reply yielded no usable JSON object.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The reply has no `{ ... }` span.
    #[error("no JSON object span in reply")]
    NoObject,

    /// The span exists but is not a JSON object.
    #[error("reply span is not a JSON object: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Locates and parses the outermost JSON object in `text`.
///
/// # Errors
///
/// Returns [`ExtractError::NoObject`] when there is no `{ ... }` span and
/// [`ExtractError::Parse`] when the span does not parse as an object.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ExtractError::NoObject);
    };
    if end < start {
        return Err(ExtractError::NoObject);
    }

    Ok(serde_json::from_str(&text[start..=end])?)
}

/// Defaults each field of a parsed reply independently.
///
/// - `recommendation` and `reasoning` keep non-empty strings and default otherwise.
/// - `considerations` and `nextSteps` keep arrays and become empty otherwise.
///   Non-string elements are rendered as compact JSON text.
#[must_use]
pub fn normalize(object: Map<String, Value>) -> AssessmentResult {
    let recommendation = non_empty_string(object.get("recommendation"))
        .map(Recommendation::from)
        .unwrap_or_default();

    let reasoning = non_empty_string(object.get("reasoning"))
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_REASONING.to_owned());

    AssessmentResult {
        recommendation,
        reasoning,
        considerations: string_list(object.get("considerations")),
        next_steps: string_list(object.get("nextSteps")),
    }
}

/// Builds the generic result used when the reply has no usable object.
#[must_use]
pub fn fallback(text: &str) -> AssessmentResult {
    let excerpt: String = text.chars().take(FALLBACK_EXCERPT_CHARS).collect();

    AssessmentResult {
        recommendation: Recommendation::PossibleFit,
        reasoning: format!("{excerpt}..."),
        considerations: FALLBACK_CONSIDERATIONS.map(str::to_owned).to_vec(),
        next_steps: FALLBACK_NEXT_STEPS.map(str::to_owned).to_vec(),
    }
}

/// Runs both stages, falling back when extraction fails.
#[must_use]
pub fn interpret(text: &str) -> AssessmentResult {
    match extract_json_object(text) {
        Ok(object) => normalize(object),
        Err(reason) => {
            tracing::warn!(
                target: TRACING_TARGET,
                reason = %reason,
                reply_chars = text.chars().count(),
                "No usable JSON object in reply, using fallback assessment"
            );
            fallback(text)
        }
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect()
}
