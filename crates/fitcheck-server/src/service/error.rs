//! Service layer error types.

use thiserror::Error;

/// Result type for service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Service layer error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The completion client could not be created.
    #[error("Failed to create completion client: {0}")]
    Completion(#[from] fitcheck_anthropic::Error),
}
