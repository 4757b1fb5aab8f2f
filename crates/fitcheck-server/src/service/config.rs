//! Service-level configuration.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use fitcheck_anthropic::{AnthropicClient, AnthropicConfig};
use fitcheck_core::{Assessor, AssessorConfig, CompletionService};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::service::Result;

/// Deployment mode, controlling diagnostic detail in error bodies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuntimeMode {
    /// Error bodies may carry internal detail.
    #[default]
    Development,
    /// Error bodies carry only the caller-facing message.
    Production,
}

impl RuntimeMode {
    /// Returns whether error bodies may include diagnostic detail.
    #[must_use]
    pub const fn exposes_details(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Deployment mode.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ENVIRONMENT", value_enum, default_value_t = RuntimeMode::Development)
    )]
    #[serde(default)]
    pub environment: RuntimeMode,

    /// Assessment pipeline settings.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[serde(default)]
    pub assessor: AssessorConfig,

    /// Anthropic client settings.
    #[cfg_attr(feature = "config", clap(flatten))]
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

impl ServiceConfig {
    /// Sets the deployment mode.
    pub fn with_environment(mut self, environment: RuntimeMode) -> Self {
        self.environment = environment;
        self
    }

    /// Creates the Anthropic completion service.
    pub fn connect_anthropic(&self) -> Result<CompletionService> {
        let client = AnthropicClient::new(self.anthropic.clone())?;
        Ok(client.into_service())
    }

    /// Creates the assessment pipeline over `completion`.
    pub fn create_assessor(&self, completion: CompletionService) -> Assessor {
        Assessor::new(completion, self.assessor.clone())
    }
}
