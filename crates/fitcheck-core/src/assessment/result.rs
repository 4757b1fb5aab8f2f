//! Fit assessment result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recommendation tier.
///
/// The four known tiers map to dedicated variants. Any other text returned
/// by the model is kept verbatim in [`Recommendation::Unrecognized`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recommendation {
    ExcellentFit,
    GoodFit,
    #[default]
    PossibleFit,
    NotRecommended,
    Unrecognized(String),
}

impl Recommendation {
    /// Returns the tier as displayed to the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ExcellentFit => "Excellent Fit",
            Self::GoodFit => "Good Fit",
            Self::PossibleFit => "Possible Fit",
            Self::NotRecommended => "Not Recommended",
            Self::Unrecognized(other) => other,
        }
    }

    /// Returns whether this is one of the four known tiers.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Recommendation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Excellent Fit" => Self::ExcellentFit,
            "Good Fit" => Self::GoodFit,
            "Possible Fit" => Self::PossibleFit,
            "Not Recommended" => Self::NotRecommended,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for Recommendation {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Recommendation> for String {
    fn from(value: Recommendation) -> Self {
        match value {
            Recommendation::Unrecognized(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured fit assessment.
///
/// Every field is always present and type-correct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    /// Recommendation tier.
    pub recommendation: Recommendation,
    /// Short rationale.
    pub reasoning: String,
    /// Factors worth weighing, possibly empty.
    pub considerations: Vec<String>,
    /// Suggested actions, possibly empty.
    pub next_steps: Vec<String>,
}
