#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod health;

pub mod assessment;
pub mod classify;
pub mod completion;

pub use assessment::{
    AssessmentRequest, AssessmentResult, Assessor, AssessorConfig, IntakeForm, Latency,
    Recommendation,
};
pub use classify::{UpstreamFailure, classify};
pub use completion::{
    CompletionProvider, CompletionRequest, CompletionResponse, CompletionService, Usage,
};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
// Re-exported so providers and callers share one token type.
pub use tokio_util::sync::CancellationToken;
