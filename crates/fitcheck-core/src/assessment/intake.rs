//! Intake form and the validated assessment request.

use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use validator::{Validate, ValidationError};

use super::TRACING_TARGET;
use crate::{Error, Result};

/// Latency tolerance of the planned integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Latency {
    /// Interactive traffic with sub-second expectations.
    Realtime,
    /// Offline batch jobs.
    Batch,
    /// Background work without a user waiting.
    Async,
}

impl Latency {
    /// Returns the human readable label used in the prompt.
    #[must_use]
    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Realtime => "Real-time (<500ms)",
            Self::Batch => "Batch processing",
            Self::Async => "Async processing",
        }
    }
}

/// Raw intake form as submitted by the caller.
///
/// Every field is optional at this stage so that missing fields surface as
/// validation errors rather than deserialization errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    /// Primary use case, free text or a preset label.
    #[validate(required, length(min = 1))]
    pub use_case: Option<String>,
    /// Projected requests per month. Any finite number is accepted.
    #[validate(required, custom(function = "finite"))]
    pub scale: Option<f64>,
    /// Latency tolerance.
    #[validate(required)]
    pub latency: Option<Latency>,
    /// Monthly budget estimate, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Compliance needs, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<String>,
}

impl IntakeForm {
    /// Validates the form and converts it into an [`AssessmentRequest`].
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending fields when `useCase`
    /// is missing or empty, or when `scale` or `latency` is missing.
    pub fn into_request(self) -> Result<AssessmentRequest> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_keys().collect();
            fields.sort();
            let fields = fields.join(", ");

            tracing::warn!(
                target: TRACING_TARGET,
                fields = %fields,
                "Intake form rejected"
            );

            return Err(Error::validation().with_message(format!("invalid fields: {fields}")));
        }

        let (Some(use_case), Some(scale), Some(latency)) =
            (self.use_case, self.scale, self.latency)
        else {
            return Err(Error::validation());
        };

        Ok(AssessmentRequest {
            use_case,
            scale,
            latency,
            budget: self.budget.filter(|b| !b.is_empty()),
            compliance: self.compliance.filter(|c| !c.is_empty()),
        })
    }
}

fn finite(scale: f64) -> std::result::Result<(), ValidationError> {
    if scale.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

/// A validated assessment request.
///
/// Lives for the duration of one assessment and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    /// Primary use case.
    pub use_case: String,
    /// Projected requests per month.
    pub scale: f64,
    /// Latency tolerance.
    pub latency: Latency,
    /// Monthly budget estimate, `None` when not given.
    pub budget: Option<String>,
    /// Compliance needs, `None` when not given.
    pub compliance: Option<String>,
}
