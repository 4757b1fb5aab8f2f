//! Assessment prompt rendering.

use super::AssessmentRequest;

const ROLE: &str = "You are an expert technical consultant evaluating whether Claude API is a good fit for a client's use case. Analyze the following requirements and provide a comprehensive assessment.";

const CRITERIA: [&str; 5] = [
    "Use case suitability - How well does Claude API match this use case?",
    "Scale feasibility - Can Claude handle this volume effectively?",
    "Latency match - Does Claude's latency profile meet the requirement?",
    "Cost-effectiveness - Is the budget sufficient for the projected scale?",
    "Compliance capabilities - Can Claude meet the compliance requirements?",
];

const RESPONSE_FORMAT: &str = r#"Provide a JSON response with the following structure:
{
  "recommendation": "Excellent Fit" | "Good Fit" | "Possible Fit" | "Not Recommended",
  "reasoning": "2-3 sentences explaining the assessment",
  "considerations": ["factor 1", "factor 2", "factor 3", "factor 4"],
  "nextSteps": ["action 1", "action 2", "action 3"]
}"#;

const CLOSING: &str = "Be specific, practical, and actionable in your assessment.";

/// Renders the assessment prompt for a validated request.
///
/// Deterministic and infallible.
#[must_use]
pub fn build_prompt(request: &AssessmentRequest) -> String {
    let budget = request.budget.as_deref().unwrap_or("Not specified");
    let compliance = request.compliance.as_deref().unwrap_or("None specified");

    let criteria: String = CRITERIA
        .iter()
        .enumerate()
        .map(|(index, criterion)| format!("{}. {criterion}\n", index + 1))
        .collect();

    format!(
        "{ROLE}\n\n\
         **Client Requirements:**\n\
         - Primary Use Case: {use_case}\n\
         - Projected Scale: {scale} requests/month\n\
         - Latency Requirement: {latency}\n\
         - Monthly Budget Estimate: {budget}\n\
         - Compliance Needs: {compliance}\n\
         \n\
         **Evaluation Criteria:**\n\
         {criteria}\
         \n\
         **Response Format:**\n\
         {RESPONSE_FORMAT}\n\n\
         {CLOSING}",
        use_case = request.use_case,
        scale = group_thousands(request.scale),
        latency = request.latency.display_label(),
    )
}

/// Formats a number with comma thousands separators, e.g. `500,000`.
///
/// At most three fraction digits are kept, without trailing zeros:
/// `1234.5678` renders as `1,234.568`.
#[must_use]
pub fn group_thousands(value: f64) -> String {
    let rendered = format!("{:.3}", value.abs());
    let (integer, fraction) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let negative = value < 0.0 && rendered.bytes().any(|b| matches!(b, b'1'..=b'9'));

    let mut grouped = String::with_capacity(rendered.len() + integer.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}
