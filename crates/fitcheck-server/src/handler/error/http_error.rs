//! HTTP error handling with builder pattern for dynamic error responses.
//!
//! Pipeline errors from `fitcheck-core` are converted with [`Error::from_core`],
//! which keeps the fixed caller-facing message of the classified kind and
//! attaches diagnostic detail only when the runtime mode allows it.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fitcheck_core::ErrorKind as CoreKind;

use crate::handler::response::{ErrorDetails, ErrorResponse};
use crate::service::RuntimeMode;

/// Tracing target for error responses.
const TRACING_TARGET: &str = "fitcheck_server::handler::error";

/// The error type for HTTP handlers in the server.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    details: Option<ErrorDetails>,
    api_status: Option<u16>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            details: None,
            api_status: None,
        }
    }

    /// Converts a pipeline error into its caller-facing form.
    ///
    /// The upstream status is attached as `apiStatus` for unknown errors.
    /// Diagnostic detail is attached for unknown and timeout errors when
    /// `mode` is development.
    pub fn from_core(error: &fitcheck_core::Error, mode: RuntimeMode) -> Self {
        let kind = ErrorKind::from(error.kind());
        let mut http_error = Self::new(kind).with_context(error.to_string());

        if kind == ErrorKind::Unknown
            && let Some(status) = error.upstream_status()
        {
            http_error = http_error.with_api_status(status);
        }

        if mode.exposes_details() && error.kind().exposes_details() {
            let failure = error.upstream_failure();
            let message = failure
                .and_then(|f| f.message.clone().or_else(|| f.nested_message.clone()))
                .or_else(|| error.message().map(str::to_owned))
                .unwrap_or_else(|| error.to_string());

            http_error = http_error.with_details(ErrorDetails {
                message,
                status: error.upstream_status(),
                code: failure.and_then(|f| f.code.clone()),
            });
        }

        http_error
    }
}

impl<'a> Error<'a> {
    /// Attaches context information to the error.
    ///
    /// Context is logged, never sent to the client.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Replaces the caller-facing message of the error kind.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Attaches diagnostic detail.
    #[inline]
    pub fn with_details(self, details: ErrorDetails) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }

    /// Attaches the upstream status code.
    #[inline]
    pub fn with_api_status(self, api_status: u16) -> Self {
        Self {
            api_status: Some(api_status),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the diagnostic detail if present.
    #[inline]
    pub fn details(&self) -> Option<&ErrorDetails> {
        self.details.as_ref()
    }

    /// Returns the upstream status code if present.
    #[inline]
    pub fn api_status(&self) -> Option<u16> {
        self.api_status
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            details: self.details,
            api_status: self.api_status,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status)
            .field("message", &response.message);

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("custom_message", message);
        }

        if let Some(api_status) = self.api_status {
            debug_struct.field("api_status", &api_status);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(&*response.message);

        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();

        if let Some(ref context) = self.context {
            tracing::debug!(
                target: TRACING_TARGET,
                name = %response.name,
                status = response.status.as_u16(),
                context = %context,
                "Responding with error"
            );
        }

        if let Some(message) = self.message {
            response = response.with_message(message);
        }

        if let Some(details) = self.details {
            response = response.with_details(details);
        }

        if let Some(api_status) = self.api_status {
            response = response.with_api_status(api_status);
        }

        response.into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Enumeration of all HTTP error kinds the server responds with.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Intake form or request body is invalid
    Validation,
    /// 400 Bad Request - Completion account is out of credits
    InsufficientCredits,
    /// 404 Not Found - No route matched
    NotFound,
    /// 413 Payload Too Large - Request body exceeds the limit
    PayloadTooLarge,
    /// 429 Too Many Requests - Completion service is throttling
    RateLimit,

    // 5xx Server Errors
    /// 500 Internal Server Error - Completion credential is not configured
    Config,
    /// 500 Internal Server Error - Completion credential was rejected
    Auth,
    /// 500 Internal Server Error - Unclassified pipeline failure
    Unknown,
    /// 500 Internal Server Error - Panic or middleware failure
    #[default]
    InternalServerError,
    /// 504 Gateway Timeout - Evaluation exceeded its budget
    Timeout,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the response template for this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::Validation => ErrorResponse::VALIDATION,
            Self::InsufficientCredits => ErrorResponse::INSUFFICIENT_CREDITS,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::PayloadTooLarge => ErrorResponse::PAYLOAD_TOO_LARGE,
            Self::RateLimit => ErrorResponse::RATE_LIMIT,
            Self::Config => ErrorResponse::CONFIG,
            Self::Auth => ErrorResponse::AUTH,
            Self::Unknown => ErrorResponse::UNKNOWN,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::Timeout => ErrorResponse::TIMEOUT,
        }
    }
}

impl From<CoreKind> for ErrorKind {
    fn from(kind: CoreKind) -> Self {
        match kind {
            CoreKind::Config => Self::Config,
            CoreKind::Auth => Self::Auth,
            CoreKind::RateLimit => Self::RateLimit,
            CoreKind::InsufficientCredits => Self::InsufficientCredits,
            CoreKind::Validation => Self::Validation,
            CoreKind::Timeout => Self::Timeout,
            CoreKind::UpstreamFormat | CoreKind::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}
