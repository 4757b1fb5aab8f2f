//! Service descriptor and health check handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use fitcheck_core::{CompletionService, ServiceHealth};
use jiff::Timestamp;

use crate::extract::Json;
use crate::handler::response::{HealthStatus, ServiceDescriptor, VERSION};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "fitcheck_server::handler::monitors";

async fn descriptor() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor::default())
}

/// Liveness check. Always `200` with `status: "ok"` while the process serves.
#[tracing::instrument(skip_all)]
async fn health_status(State(completion): State<CompletionService>) -> Json<HealthStatus> {
    let completion_health = match completion.health_check().await {
        Ok(health) => health,
        Err(error) => ServiceHealth::unhealthy(error.to_string()),
    };

    tracing::debug!(
        target: TRACING_TARGET,
        provider = completion.provider_name(),
        has_credentials = completion.has_credentials(),
        completion_status = ?completion_health.status,
        "Health status requested"
    );

    Json(HealthStatus {
        status: "ok".to_owned(),
        timestamp: Timestamp::now(),
        version: VERSION.to_owned(),
        has_credentials: completion.has_credentials(),
        provider: completion.provider_name().to_owned(),
        completion: completion_health,
    })
}

/// Returns a [`Router`] with the descriptor and health routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(descriptor))
        .route("/api/health", get(health_status))
}
