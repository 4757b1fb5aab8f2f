//! Mock completion provider for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use fitcheck_core::{
    Assessor, AssessorConfig, CancellationToken, CompletionProvider, CompletionRequest,
    CompletionResponse, CompletionService, Error, ErrorKind, Result, ServiceHealth,
    UpstreamFailure,
};

/// What the mock does when asked for a completion.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply with this text.
    Reply(String),
    /// Reply with an envelope that has no text payload.
    NoText,
    /// Fail as if the upstream returned this error.
    Fail(UpstreamFailure),
    /// Fail with an already classified error kind.
    Error(ErrorKind),
    /// Never reply; wait until cancelled.
    Hang,
}

/// Mock completion provider.
///
/// Clones share the call counter and request log, so a clone kept by the
/// test observes calls made through a [`CompletionService`].
#[derive(Debug, Clone)]
pub struct MockCompletionProvider {
    behavior: MockBehavior,
    has_credentials: bool,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionProvider {
    /// Creates a mock with the given behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            has_credentials: true,
            delay: Duration::ZERO,
            calls: Arc::default(),
            requests: Arc::default(),
        }
    }

    /// Creates a mock that replies with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    /// Creates a mock that fails with `failure`.
    pub fn failing(failure: UpstreamFailure) -> Self {
        Self::new(MockBehavior::Fail(failure))
    }

    /// Reports no configured credential.
    #[must_use]
    pub fn without_credentials(mut self) -> Self {
        self.has_credentials = false;
        self
    }

    /// Waits `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completion calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompt of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        self.requests().pop().map(|request| request.prompt)
    }

    /// Wraps a clone of this mock in a [`CompletionService`].
    pub fn service(&self) -> CompletionService {
        CompletionService::new(self.clone())
    }

    async fn respond(&self, cancel: &CancellationToken) -> Result<CompletionResponse> {
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(CompletionResponse::from_text(text.clone())),
            MockBehavior::NoText => Ok(CompletionResponse {
                stop_reason: Some("end_turn".to_owned()),
                ..CompletionResponse::default()
            }),
            MockBehavior::Fail(failure) => Err(Error::upstream(failure.clone())),
            MockBehavior::Error(kind) => Err(Error::new(*kind)),
            MockBehavior::Hang => {
                cancel.cancelled().await;
                Err(Error::timeout())
            }
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if !self.delay.is_zero() {
            tokio::select! {
                () = cancel.cancelled() => return Err(Error::timeout()),
                () = tokio::time::sleep(self.delay) => {}
            }
        }

        self.respond(cancel).await
    }

    fn has_credentials(&self) -> bool {
        self.has_credentials
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        if self.has_credentials {
            Ok(ServiceHealth::healthy())
        } else {
            Ok(ServiceHealth::degraded("credential not configured"))
        }
    }
}

/// Builds an [`Assessor`] with default configuration over a clone of `mock`.
pub fn mock_assessor(mock: &MockCompletionProvider) -> Assessor {
    Assessor::new(mock.service(), AssessorConfig::default())
}
