//! Anthropic client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Default value of the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Default transport timeout: 120 seconds.
///
/// Longer than the evaluation budget, so the budget is what callers observe.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Configuration for the [`AnthropicClient`].
///
/// [`AnthropicClient`]: crate::AnthropicClient
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct AnthropicConfig {
    /// API key sent in the `x-api-key` header.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-api-key", env = "ANTHROPIC_API_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the Messages API.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-base-url", env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `anthropic-version` header.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-version", env = "ANTHROPIC_VERSION", default_value = DEFAULT_API_VERSION)
    )]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Transport timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-http-timeout", env = "ANTHROPIC_HTTP_TIMEOUT", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)
    )]
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            http_timeout: default_http_timeout(),
        }
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl AnthropicConfig {
    /// Returns the API key, treating an empty value as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Returns whether an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Returns the transport timeout, using the default if zero.
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the transport timeout in seconds.
    pub fn with_http_timeout(mut self, secs: u64) -> Self {
        self.http_timeout = secs;
        self
    }
}
