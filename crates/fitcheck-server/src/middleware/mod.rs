//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Recovery (panics, outer timeout, tower errors)
//! - Observability (request ids, trace spans, sensitive headers)
//! - Security (CORS, body limit, response headers)
//! - Credential guard for routes that call the completion service
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use axum::Router;
//! use fitcheck_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app = Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```

mod credentials;
mod observability;
mod recovery;
mod security;

pub use credentials::require_credentials;
pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{DEFAULT_REQUEST_TIMEOUT_SECS, RecoveryConfig, RouterRecoveryExt};
pub use security::{BodyLimitConfig, CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt};
