//! Assessment pipeline configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Default output budget in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default evaluation budget in seconds.
pub const DEFAULT_EVALUATION_TIMEOUT_SECS: u64 = 60;

/// Configuration for the [`Assessor`].
///
/// [`Assessor`]: super::Assessor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct AssessorConfig {
    /// Model identifier sent with every completion request.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-model", env = "ANTHROPIC_MODEL", default_value = DEFAULT_MODEL)
    )]
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on generated tokens.
    #[cfg_attr(
        feature = "config",
        arg(long = "anthropic-max-tokens", env = "ANTHROPIC_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)
    )]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Seconds a single evaluation may wait for the completion service.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "EVALUATION_TIMEOUT", default_value_t = DEFAULT_EVALUATION_TIMEOUT_SECS)
    )]
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_timeout: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_evaluation_timeout() -> u64 {
    DEFAULT_EVALUATION_TIMEOUT_SECS
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            evaluation_timeout: default_evaluation_timeout(),
        }
    }
}

impl AssessorConfig {
    /// Returns the evaluation budget as a `Duration`.
    #[must_use]
    pub const fn evaluation_timeout(&self) -> Duration {
        Duration::from_secs(self.evaluation_timeout)
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the evaluation budget in seconds.
    pub fn with_evaluation_timeout(mut self, secs: u64) -> Self {
        self.evaluation_timeout = secs;
        self
    }
}
