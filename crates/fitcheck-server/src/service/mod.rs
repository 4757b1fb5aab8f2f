//! Application state and dependency injection.

mod config;
mod error;

use fitcheck_core::{Assessor, CompletionService};

pub use crate::service::config::{RuntimeMode, ServiceConfig};
pub use crate::service::error::{Result, ServiceError};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    completion: CompletionService,
    assessor: Assessor,
    runtime_mode: RuntimeMode,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Creates the Anthropic completion client; a missing API key is not an error.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let completion = config.connect_anthropic()?;
        Ok(Self::with_completion(config, completion))
    }

    /// Initializes application state over an existing completion service.
    pub fn with_completion(config: &ServiceConfig, completion: CompletionService) -> Self {
        Self {
            assessor: config.create_assessor(completion.clone()),
            completion,
            runtime_mode: config.environment,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(completion: CompletionService);
impl_di!(assessor: Assessor);
impl_di!(runtime_mode: RuntimeMode);
