//! The fit assessment pipeline.
//!
//! [`Assessor::assess`] runs the whole transformation for one intake form:
//!
//! ```text
//! credential check -> validation -> prompt -> completion -> extraction -> result
//! ```
//!
//! Every step is either pure or local to the call, so an `Assessor` can be
//! cloned into any number of concurrent handlers.

mod config;
mod extract;
mod intake;
mod prompt;
mod result;

use std::time::Instant;

use tokio_util::sync::CancellationToken;

pub use self::config::{
    AssessorConfig, DEFAULT_EVALUATION_TIMEOUT_SECS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
pub use self::extract::{
    DEFAULT_REASONING, FALLBACK_CONSIDERATIONS, FALLBACK_EXCERPT_CHARS, FALLBACK_NEXT_STEPS,
    ExtractError, extract_json_object, fallback, interpret, normalize,
};
pub use self::intake::{AssessmentRequest, IntakeForm, Latency};
pub use self::prompt::{build_prompt, group_thousands};
pub use self::result::{AssessmentResult, Recommendation};
use crate::completion::{CompletionRequest, CompletionService};
use crate::{Error, ErrorKind, Result};

/// Tracing target for assessment operations.
pub const TRACING_TARGET: &str = "fitcheck_core::assessment";

/// Runs fit assessments against a completion service.
#[derive(Debug, Clone)]
pub struct Assessor {
    completion: CompletionService,
    config: AssessorConfig,
}

impl Assessor {
    /// Creates a new assessor.
    pub fn new(completion: CompletionService, config: AssessorConfig) -> Self {
        Self { completion, config }
    }

    /// Returns the completion service.
    pub fn completion(&self) -> &CompletionService {
        &self.completion
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AssessorConfig {
        &self.config
    }

    /// Produces a fit assessment for `form`.
    ///
    /// Makes at most one completion call. Nothing is sent when the credential
    /// is missing or the form is invalid. A reply without a usable JSON object
    /// yields the fallback assessment instead of an error.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Config`] when no credential is configured
    /// - [`ErrorKind::Validation`] when required fields are missing
    /// - [`ErrorKind::Timeout`] when the budget runs out or `cancel` fires
    /// - the classified kind of any upstream failure
    pub async fn assess(
        &self,
        form: IntakeForm,
        cancel: &CancellationToken,
    ) -> Result<AssessmentResult> {
        if !self.completion.has_credentials() {
            tracing::error!(
                target: TRACING_TARGET,
                provider = self.completion.provider_name(),
                "Completion credential is not configured"
            );
            return Err(Error::config());
        }

        let request = form.into_request()?;
        let started = Instant::now();

        let prompt = build_prompt(&request);
        tracing::debug!(
            target: TRACING_TARGET,
            latency = request.latency.as_ref(),
            scale = request.scale,
            prompt_chars = prompt.chars().count(),
            "Assessment prompt rendered"
        );

        let completion = CompletionRequest {
            prompt,
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
        };

        let reply = self
            .completion
            .complete(&completion, self.config.evaluation_timeout(), cancel)
            .await;

        let text = match reply {
            Ok(response) => response.text.unwrap_or_else(|| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    "Completion reply has no text payload"
                );
                String::new()
            }),
            Err(error) if error.kind() == ErrorKind::UpstreamFormat => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Completion reply is malformed"
                );
                String::new()
            }
            Err(error) => return Err(error),
        };

        let result = interpret(&text);

        tracing::info!(
            target: TRACING_TARGET,
            recommendation = %result.recommendation,
            considerations = result.considerations.len(),
            next_steps = result.next_steps.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Assessment completed"
        );

        Ok(result)
    }
}
