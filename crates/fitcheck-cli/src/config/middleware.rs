//! Middleware configuration for the HTTP server.
//!
//! All middleware configs are re-exported from `fitcheck-server` and support
//! both CLI arguments and environment variables.
//!
//! # Example
//!
//! ```bash
//! fitcheck-cli --cors-origins "https://example.com" --request-timeout 120
//! ```

use clap::Args;
use fitcheck_server::middleware::{BodyLimitConfig, CorsConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use super::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS, body limit and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Request body size limit.
    #[clap(flatten)]
    pub body_limit: BodyLimitConfig,

    /// Recovery middleware configuration.
    ///
    /// Controls the outer request timeout and panic recovery behavior.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            max_age_secs = self.cors.max_age_seconds,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_body_size = self.body_limit.max_body_size,
            request_timeout_secs = self.recovery.request_timeout,
            "Request limits configuration"
        );
    }
}
