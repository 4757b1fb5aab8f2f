use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use fitcheck_core::CompletionService;

use crate::handler::{ErrorKind, Result};

/// Tracing target for the credential guard.
const TRACING_TARGET: &str = "fitcheck_server::middleware::credentials";

/// Requires a configured completion credential to proceed with the request.
///
/// Runs before any extractor, so a misconfigured deployment answers with a
/// configuration error even for malformed request bodies.
///
/// #### Examples
///
/// ```rust,ignore
/// use axum::middleware::from_fn_with_state;
/// use fitcheck_server::middleware::require_credentials;
///
/// let _guard = from_fn_with_state(state, require_credentials);
/// ```
pub async fn require_credentials(
    State(completion): State<CompletionService>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !completion.has_credentials() {
        tracing::error!(
            target: TRACING_TARGET,
            provider = completion.provider_name(),
            path = %request.uri().path(),
            "Completion credential is not configured"
        );
        return Err(ErrorKind::Config.into_error());
    }

    Ok(next.run(request).await)
}
