//! Completion service wrapper with observability and a cancellation budget.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::{CompletionProvider, CompletionRequest, CompletionResponse, TRACING_TARGET};
use crate::{Error, Result, ServiceHealth};

/// Completion service wrapper.
///
/// The provider is held behind an `Arc`, so clones are cheap and can be
/// shared across request handlers.
#[derive(Clone)]
pub struct CompletionService {
    inner: Arc<dyn CompletionProvider>,
}

impl fmt::Debug for CompletionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionService")
            .field("provider", &self.inner.provider_name())
            .field("has_credentials", &self.inner.has_credentials())
            .finish()
    }
}

impl CompletionService {
    /// Wraps a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: CompletionProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Wraps a shared provider.
    pub fn from_arc(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { inner: provider }
    }

    /// Returns whether the provider has a credential configured.
    pub fn has_credentials(&self) -> bool {
        self.inner.has_credentials()
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    /// Runs one completion inside `budget`.
    ///
    /// The provider gets a child of `cancel`. When the budget runs out the
    /// child is cancelled and a timeout error is returned. Cancelling `cancel`
    /// itself also ends the call with a timeout error.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<CompletionResponse> {
        let started = Instant::now();
        let child = cancel.child_token();

        tracing::debug!(
            target: TRACING_TARGET,
            provider = self.provider_name(),
            model = %request.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.chars().count(),
            budget_secs = budget.as_secs(),
            "Sending completion request"
        );

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                Err(Error::timeout().with_message("completion cancelled before it finished"))
            }
            () = tokio::time::sleep(budget) => {
                child.cancel();
                Err(Error::timeout().with_message(format!(
                    "completion exceeded its {}s budget",
                    budget.as_secs()
                )))
            }
            result = self.inner.complete(request, &child) => result,
        };

        let elapsed = started.elapsed();
        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = self.provider_name(),
                    elapsed_ms = elapsed.as_millis(),
                    has_text = response.text.is_some(),
                    stop_reason = ?response.stop_reason,
                    "Completion succeeded"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    provider = self.provider_name(),
                    elapsed_ms = elapsed.as_millis(),
                    kind = %error.kind(),
                    upstream_status = ?error.upstream_status(),
                    error = %error,
                    "Completion failed"
                );
            }
        }

        result
    }

    /// Performs a health check on the provider.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        let started = Instant::now();
        let health = self.inner.health_check().await?;
        Ok(health.with_response_time(started.elapsed()))
    }
}
