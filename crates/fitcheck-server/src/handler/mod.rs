//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use fitcheck_server::handler::routes;
//! use fitcheck_server::service::{ServiceConfig, ServiceState};
//!
//! let state = ServiceState::from_config(&ServiceConfig::default())?;
//! let app = routes(state.clone()).with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod evaluate;
mod monitors;
mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{
    Endpoints, ErrorDetails, ErrorResponse, HealthStatus, ServiceDescriptor, VERSION,
};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and the not-found fallback.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(evaluate::routes(state))
        .merge(monitors::routes())
        .fallback(handler)
}
