//! Monitor response types.

use fitcheck_core::ServiceHealth;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Application version reported by the monitor endpoints.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness response for `GET /api/health`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// When this status was generated.
    pub timestamp: Timestamp,
    /// Application version.
    pub version: String,
    /// Whether the completion credential is configured.
    pub has_credentials: bool,
    /// Name of the completion provider.
    pub provider: String,
    /// Health reported by the completion provider.
    pub completion: ServiceHealth,
}

/// Endpoint map inside the [`ServiceDescriptor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub health: String,
    pub evaluate: String,
}

/// Service descriptor for `GET /`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
    pub status: String,
}

impl Default for ServiceDescriptor {
    fn default() -> Self {
        Self {
            message: "Claude Fit-Check API Server".to_owned(),
            version: VERSION.to_owned(),
            endpoints: Endpoints {
                health: "/api/health".to_owned(),
                evaluate: "/api/evaluate (POST)".to_owned(),
            },
            status: "running".to_owned(),
        }
    }
}
