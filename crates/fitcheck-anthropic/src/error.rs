//! Error types for the Anthropic client.

use fitcheck_core::UpstreamFailure;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Reply body is not valid JSON.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Configured base URL is unusable.
    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for fitcheck_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Http(e) if e.is_timeout() => fitcheck_core::Error::timeout()
                .with_message(e.to_string())
                .with_source(e),
            Error::Http(e) => {
                let mut failure = UpstreamFailure::transport(e.to_string());
                failure.status = e.status().map(|status| status.as_u16());
                fitcheck_core::Error::upstream(failure).with_source(e)
            }
            Error::Serde(e) => fitcheck_core::Error::upstream_format()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => fitcheck_core::Error::unknown()
                .with_message(e.to_string())
                .with_source(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use fitcheck_core::ErrorKind;

    use super::*;

    #[test]
    fn malformed_body_is_upstream_format() {
        let serde_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: fitcheck_core::Error = Error::from(serde_error).into();
        assert_eq!(error.kind(), ErrorKind::UpstreamFormat);
    }

    #[test]
    fn bad_url_is_unknown() {
        let url_error = url::Url::parse("::not a url::").unwrap_err();
        let error: fitcheck_core::Error = Error::from(url_error).into();
        assert_eq!(error.kind(), ErrorKind::Unknown);
    }
}
