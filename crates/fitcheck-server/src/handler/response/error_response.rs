use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fitcheck_core::ErrorKind as CoreKind;
use serde::{Deserialize, Serialize};

/// Internal diagnostic detail, only sent outside production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Internal error message.
    pub message: String,
    /// Upstream status code, if one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Upstream error type code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// HTTP error response body.
///
/// Serializes as `{"name", "error", "details"?, "apiStatus"?}`.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    #[serde(rename = "error")]
    pub message: Cow<'a, str>,
    /// Diagnostic detail (development mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
    /// Status code returned by the completion service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_status: Option<u16>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const INSUFFICIENT_CREDITS: Self = Self::new(
        "insufficient_credits_error",
        CoreKind::InsufficientCredits.message(),
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "Request body too large",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    pub const RATE_LIMIT: Self = Self::new(
        "rate_limit_error",
        CoreKind::RateLimit.message(),
        StatusCode::TOO_MANY_REQUESTS,
    );
    pub const VALIDATION: Self = Self::new(
        "validation_error",
        CoreKind::Validation.message(),
        StatusCode::BAD_REQUEST,
    );
    // 5xx Server Errors
    pub const AUTH: Self = Self::new(
        "auth_error",
        CoreKind::Auth.message(),
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const CONFIG: Self = Self::new(
        "config_error",
        CoreKind::Config.message(),
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const TIMEOUT: Self = Self::new(
        "timeout_error",
        CoreKind::Timeout.message(),
        StatusCode::GATEWAY_TIMEOUT,
    );
    pub const UNKNOWN: Self = Self::new(
        "unknown_error",
        CoreKind::Unknown.message(),
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            details: None,
            api_status: None,
            status,
        }
    }

    /// Replaces the caller-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches diagnostic detail.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches the upstream status code.
    pub fn with_api_status(mut self, api_status: u16) -> Self {
        self.api_status = Some(api_status);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
