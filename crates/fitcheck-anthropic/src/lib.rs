#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod wire;

pub use client::AnthropicClient;
pub use config::{
    AnthropicConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS,
};
pub use error::{Error, Result};

/// Tracing target for Anthropic client operations.
pub const TRACING_TARGET: &str = "fitcheck_anthropic::client";
