//! Upstream failure classification.
//!
//! Providers describe a failed completion call as an [`UpstreamFailure`]:
//! the status code (if any) plus the error text found at the two locations
//! the completion API uses. [`classify`] maps that description to an
//! [`ErrorKind`] without touching the transport.

use serde::{Deserialize, Serialize};

use crate::ErrorKind;

/// Marker the completion API puts in billing exhaustion messages.
pub const CREDIT_BALANCE_MARKER: &str = "credit balance";

/// The observable shape of a failed upstream call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    /// HTTP status code, absent for transport failures.
    pub status: Option<u16>,
    /// Top-level error message.
    pub message: Option<String>,
    /// Message nested one level down, under `error.message`.
    pub nested_message: Option<String>,
    /// Error type or code reported by the upstream service.
    pub code: Option<String>,
}

impl UpstreamFailure {
    /// Creates a failure carrying only a status code.
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Creates a failure for a call that never produced a status code.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets the top-level message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the nested `error.message` text.
    #[must_use]
    pub fn with_nested_message(mut self, message: impl Into<String>) -> Self {
        self.nested_message = Some(message.into());
        self
    }

    /// Sets the upstream error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns whether either message location contains `needle`.
    ///
    /// Only the top level and one level of nesting are inspected.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        [&self.message, &self.nested_message]
            .into_iter()
            .flatten()
            .any(|text| text.contains(needle))
    }
}

/// Maps an upstream failure to its error kind.
///
/// | status | condition | kind |
/// |---|---|---|
/// | 401 | | [`ErrorKind::Auth`] |
/// | 429 | | [`ErrorKind::RateLimit`] |
/// | 400 | mentions "credit balance" | [`ErrorKind::InsufficientCredits`] |
/// | anything else, or none | | [`ErrorKind::Unknown`] |
#[must_use]
pub fn classify(failure: &UpstreamFailure) -> ErrorKind {
    match failure.status {
        Some(401) => ErrorKind::Auth,
        Some(429) => ErrorKind::RateLimit,
        Some(400) if failure.mentions(CREDIT_BALANCE_MARKER) => ErrorKind::InsufficientCredits,
        _ => ErrorKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW_BALANCE: &str =
        "Your credit balance is too low to access the Anthropic API. Please go to Plans & Billing.";

    #[test]
    fn unauthorized_is_auth() {
        let failure = UpstreamFailure::with_status(401).with_message("invalid x-api-key");
        assert_eq!(classify(&failure), ErrorKind::Auth);
    }

    #[test]
    fn too_many_requests_is_rate_limit() {
        assert_eq!(classify(&UpstreamFailure::with_status(429)), ErrorKind::RateLimit);
    }

    #[test]
    fn credit_balance_at_top_level() {
        let failure = UpstreamFailure::with_status(400).with_message(LOW_BALANCE);
        assert_eq!(classify(&failure), ErrorKind::InsufficientCredits);
    }

    #[test]
    fn credit_balance_nested_one_level() {
        let failure = UpstreamFailure::with_status(400)
            .with_nested_message(LOW_BALANCE)
            .with_code("invalid_request_error");
        assert_eq!(classify(&failure), ErrorKind::InsufficientCredits);
    }

    #[test]
    fn other_bad_request_is_unknown() {
        let failure = UpstreamFailure::with_status(400).with_message("max_tokens: too large");
        assert_eq!(classify(&failure), ErrorKind::Unknown);
    }

    #[test]
    fn credit_balance_on_other_status_is_unknown() {
        let failure = UpstreamFailure::with_status(500).with_message(LOW_BALANCE);
        assert_eq!(classify(&failure), ErrorKind::Unknown);
    }

    #[test]
    fn transport_failure_is_unknown() {
        let failure = UpstreamFailure::transport("connection refused");
        assert_eq!(classify(&failure), ErrorKind::Unknown);
        assert_eq!(failure.status, None);
    }

    #[test]
    fn marker_is_case_sensitive() {
        let failure = UpstreamFailure::with_status(400).with_message("CREDIT BALANCE too low");
        assert_eq!(classify(&failure), ErrorKind::Unknown);
    }
}
