//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, body limit, request timeout
//! └── service: ServiceConfig        # Environment, model, Anthropic client
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! fitcheck-cli --anthropic-api-key "sk-ant-..." --port 8080
//!
//! # Or via environment variables
//! ANTHROPIC_API_KEY="sk-ant-..." PORT=8080 fitcheck-cli
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::{Context, anyhow, ensure};
use clap::Parser;
use fitcheck_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Upper bound for every timeout option, in seconds.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Complete CLI configuration.
///
/// Combines all configuration groups for the fit-check server:
/// - [`ServerConfig`]: Network binding and shutdown
/// - [`MiddlewareConfig`]: HTTP middleware (CORS, body limit, recovery)
/// - [`ServiceConfig`]: Runtime mode, assessment settings and the Anthropic client
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "fitcheck")]
#[command(about = "Claude fit-check assessment server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, body limit, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Assessment and completion service configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This ensures .env files are loaded before clap parses arguments, allowing
    /// environment variables from .env to be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is outside its valid range, if the outer
    /// request timeout does not exceed the evaluation timeout, or if the
    /// Anthropic base URL does not parse.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.validate_timeouts()
            .context("invalid timeout configuration")?;
        self.validate_service()
            .context("invalid service configuration")?;
        Ok(())
    }

    fn validate_timeouts(&self) -> anyhow::Result<()> {
        let request_timeout = self.middleware.recovery.request_timeout;
        let evaluation_timeout = self.service.assessor.evaluation_timeout;

        ensure!(
            (1..=MAX_TIMEOUT_SECS).contains(&request_timeout),
            "Request timeout {request_timeout} seconds is invalid. Must be between 1 and {MAX_TIMEOUT_SECS} seconds."
        );
        ensure!(
            (1..=MAX_TIMEOUT_SECS).contains(&evaluation_timeout),
            "Evaluation timeout {evaluation_timeout} seconds is invalid. Must be between 1 and {MAX_TIMEOUT_SECS} seconds."
        );
        ensure!(
            request_timeout > evaluation_timeout,
            "Request timeout ({request_timeout}s) must be greater than the evaluation timeout ({evaluation_timeout}s)."
        );

        Ok(())
    }

    fn validate_service(&self) -> anyhow::Result<()> {
        let base_url = &self.service.anthropic.base_url;
        Url::parse(base_url).with_context(|| format!("invalid Anthropic base URL '{base_url}'"))?;

        if self.service.assessor.max_tokens == 0 {
            return Err(anyhow!("Max tokens must be greater than zero."));
        }
        if self.middleware.body_limit.max_body_size == 0 {
            return Err(anyhow!("Max body size must be greater than zero."));
        }

        Ok(())
    }

    /// Logs configuration at info level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        let service = &self.service;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            environment = %service.environment,
            model = %service.assessor.model,
            max_tokens = service.assessor.max_tokens,
            evaluation_timeout_secs = service.assessor.evaluation_timeout,
            "Assessment configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_url = %service.anthropic.base_url,
            api_version = %service.anthropic.api_version,
            has_api_key = service.anthropic.has_api_key(),
            "Anthropic configuration"
        );

        if !service.anthropic.has_api_key() {
            tracing::warn!(
                target: TRACING_TARGET_CONFIG,
                "ANTHROPIC_API_KEY not set, evaluations will fail until it is configured"
            );
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
