//! HTTP server startup with lifecycle management and graceful shutdown.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;

pub use self::error::{Result, ServerError};
use self::http_server::serve_http;

use crate::config::ServerConfig;

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// # Errors
///
/// Returns an error if:
/// - The server configuration is invalid
/// - Cannot bind to the specified address/port
/// - The server encounters a fatal error during operation
pub async fn serve(app: Router, config: &ServerConfig) -> Result<()> {
    serve_http(app, config).await
}
