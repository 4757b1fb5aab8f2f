//! Text completion abstractions.
//!
//! A [`CompletionProvider`] sends one single-turn prompt to a completion
//! service and returns the primary text payload of the reply. Providers are
//! wrapped in a [`CompletionService`], which adds logging, latency
//! measurement and the per-call cancellation budget.
//!
//! # Example
//!
//! ```rust,ignore
//! use fitcheck_core::completion::{CompletionProvider, CompletionRequest, CompletionResponse};
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl CompletionProvider for Echo {
//!     async fn complete(
//!         &self,
//!         request: &CompletionRequest,
//!         _cancel: &CancellationToken,
//!     ) -> Result<CompletionResponse> {
//!         Ok(CompletionResponse::from_text(request.prompt.clone()))
//!     }
//!
//!     fn has_credentials(&self) -> bool {
//!         true
//!     }
//!
//!     fn provider_name(&self) -> &'static str {
//!         "echo"
//!     }
//!
//!     async fn health_check(&self) -> Result<ServiceHealth> {
//!         Ok(ServiceHealth::healthy())
//!     }
//! }
//! ```

mod service;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub use self::service::CompletionService;
use crate::{Result, ServiceHealth};

/// Tracing target for completion operations.
pub const TRACING_TARGET: &str = "fitcheck_core::completion";

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The full prompt, sent as one user message.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// Token accounting reported by the completion service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens consumed.
    pub input_tokens: u32,
    /// Tokens generated.
    pub output_tokens: u32,
}

/// The parts of a completion reply the pipeline cares about.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Primary text payload, `None` when the reply had no text at the expected position.
    pub text: Option<String>,
    /// Model that produced the reply.
    pub model: Option<String>,
    /// Why generation stopped.
    pub stop_reason: Option<String>,
    /// Token usage, if reported.
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Creates a response carrying only a text payload.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Core trait for completion providers.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the prompt and waits for the reply.
    ///
    /// Implementations should stop waiting once `cancel` fires and return
    /// an [`ErrorKind::Timeout`] error.
    ///
    /// [`ErrorKind::Timeout`]: crate::ErrorKind::Timeout
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResponse>;

    /// Returns whether a credential is configured.
    ///
    /// Checked before any prompt work so that a missing credential fails fast.
    fn has_credentials(&self) -> bool;

    /// Short name used in logs and health reports.
    fn provider_name(&self) -> &'static str;

    /// Reports provider health without sending a completion.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
