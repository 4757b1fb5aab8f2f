//! Error taxonomy shared by the assessment pipeline and its providers.
//!
//! Every failure that can leave the pipeline is tagged with exactly one
//! [`ErrorKind`]. The kind carries the caller-facing status code and message,
//! while [`Error`] keeps the internal detail (message, source, upstream shape)
//! for logging and development-mode diagnostics.

use std::borrow::Cow;
use std::error::Error as StdError;

use strum::{AsRefStr, Display, IntoStaticStr};

use crate::classify::{UpstreamFailure, classify};

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for pipeline operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classified failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The completion credential is not configured.
    Config,
    /// The completion service rejected the credential.
    Auth,
    /// The completion service is throttling requests.
    RateLimit,
    /// The completion account has run out of credits.
    InsufficientCredits,
    /// The intake form is missing required fields.
    Validation,
    /// The completion call exceeded its budget or was cancelled.
    Timeout,
    /// The completion reply had no usable text payload.
    ///
    /// Recovered by the assessment fallback and never surfaced to callers.
    UpstreamFormat,
    /// Anything else.
    Unknown,
}

impl ErrorKind {
    /// Returns the HTTP-style status code reported to the caller.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation | Self::InsufficientCredits => 400,
            Self::RateLimit => 429,
            Self::Timeout => 504,
            Self::Config | Self::Auth | Self::UpstreamFormat | Self::Unknown => 500,
        }
    }

    /// Returns the fixed caller-facing message for this kind.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Config => {
                "ANTHROPIC_API_KEY is not configured. Please add it to your .env file."
            }
            Self::Auth => {
                "Invalid API key. Please check your ANTHROPIC_API_KEY environment variable."
            }
            Self::RateLimit => "Rate limit exceeded. Please try again later.",
            Self::InsufficientCredits => {
                "Insufficient API credits. Please add credits to your Anthropic account at https://console.anthropic.com/settings/plans"
            }
            Self::Validation => {
                "Missing required fields: useCase, scale, and latency are required"
            }
            Self::Timeout => "The evaluation took too long to complete. Please try again.",
            Self::UpstreamFormat | Self::Unknown => {
                "Failed to evaluate request. Please try again."
            }
        }
    }

    /// Returns whether internal detail may be shown for this kind outside production.
    #[must_use]
    pub const fn exposes_details(self) -> bool {
        matches!(self, Self::Unknown | Self::Timeout | Self::UpstreamFormat)
    }
}

/// A classified pipeline error.
#[derive(Debug, thiserror::Error)]
#[error("{kind}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    upstream: Option<UpstreamFailure>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            upstream: None,
            source: None,
        }
    }

    /// Creates an error from a failed upstream call, classifying it.
    pub fn upstream(failure: UpstreamFailure) -> Self {
        Self {
            kind: classify(&failure),
            message: failure.message.clone().map(Cow::Owned),
            upstream: Some(failure),
            source: None,
        }
    }

    /// Creates a new configuration error.
    pub fn config() -> Self {
        Self::new(ErrorKind::Config)
    }

    /// Creates a new validation error.
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new upstream format error.
    pub fn upstream_format() -> Self {
        Self::new(ErrorKind::UpstreamFormat)
    }

    /// Creates a new unknown error.
    pub fn unknown() -> Self {
        Self::new(ErrorKind::Unknown)
    }

    /// Attaches an internal message.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches a source error.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the internal message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the upstream failure this error was classified from, if any.
    #[must_use]
    pub fn upstream_failure(&self) -> Option<&UpstreamFailure> {
        self.upstream.as_ref()
    }

    /// Returns the upstream status code, if one was received.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream.as_ref().and_then(|u| u.status)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
