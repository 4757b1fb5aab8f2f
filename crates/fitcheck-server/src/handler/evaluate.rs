//! Fit assessment handler.

use axum::Router;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use fitcheck_core::{
    AssessmentResult, Assessor, CancellationToken, ErrorKind as CoreKind, IntakeForm,
};

use crate::extract::Json;
use crate::handler::{Error, Result};
use crate::middleware::require_credentials;
use crate::service::{RuntimeMode, ServiceState};

/// Tracing target for evaluation operations.
const TRACING_TARGET: &str = "fitcheck_server::handler::evaluate";

/// Runs one assessment for the submitted intake form.
///
/// The completion call is cancelled when the client goes away.
#[tracing::instrument(skip_all)]
async fn evaluate(
    State(assessor): State<Assessor>,
    State(mode): State<RuntimeMode>,
    Json(form): Json<IntakeForm>,
) -> Result<Json<AssessmentResult>> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    tracing::info!(
        target: TRACING_TARGET,
        latency = ?form.latency,
        scale = ?form.scale,
        "Evaluation requested"
    );

    match assessor.assess(form, &cancel).await {
        Ok(result) => {
            tracing::info!(
                target: TRACING_TARGET,
                recommendation = %result.recommendation,
                considerations = result.considerations.len(),
                next_steps = result.next_steps.len(),
                "Evaluation completed"
            );
            Ok(Json(result))
        }
        Err(error) => {
            match error.kind() {
                CoreKind::Validation => tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Evaluation rejected"
                ),
                kind => tracing::error!(
                    target: TRACING_TARGET,
                    kind = %kind,
                    api_status = ?error.upstream_status(),
                    error = %error,
                    "Evaluation failed"
                ),
            }
            Err(Error::from_core(&error, mode))
        }
    }
}

/// Returns a [`Router`] with the evaluation route behind the credential guard.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/api/evaluate", post(evaluate))
        .route_layer(from_fn_with_state(state, require_credentials))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use fitcheck_core::UpstreamFailure;
    use fitcheck_test::{MockBehavior, MockCompletionProvider};
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::routes as all_routes;
    use crate::handler::test::{
        create_test_server, create_test_server_with_router, create_test_state,
    };

    const GOOD_FIT_REPLY: &str = r#"{"recommendation":"Good Fit","reasoning":"Solid match.","considerations":["a"],"nextSteps":["b"]}"#;

    fn example_form() -> Value {
        json!({
            "useCase": "Customer Support Agent",
            "scale": 500000,
            "latency": "realtime",
            "budget": "$2000",
            "compliance": "SOC2"
        })
    }

    fn assert_error(body: &Value, name: &str) {
        assert_eq!(body["name"], name, "body: {body}");
        assert!(body["error"].is_string(), "body: {body}");
    }

    #[tokio::test]
    async fn example_round_trip() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::replying(GOOD_FIT_REPLY);
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "recommendation": "Good Fit",
            "reasoning": "Solid match.",
            "considerations": ["a"],
            "nextSteps": ["b"]
        }));

        assert_eq!(mock.call_count(), 1);
        let prompt = mock.last_prompt().unwrap_or_default();
        assert!(prompt.contains("500,000"));
        assert!(prompt.contains("Real-time (<500ms)"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_never_reach_provider() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::replying(GOOD_FIT_REPLY);
        let server = create_test_server(&mock)?;

        for missing in ["useCase", "scale", "latency"] {
            let mut form = example_form();
            if let Some(object) = form.as_object_mut() {
                object.remove(missing);
            }

            let response = server.post("/api/evaluate").json(&form).await;
            response.assert_status_bad_request();

            let body = response.json::<Value>();
            assert_error(&body, "validation_error");
            assert_eq!(
                body["error"],
                "Missing required fields: useCase, scale, and latency are required"
            );
        }

        let mut form = example_form();
        form["useCase"] = json!("");
        server
            .post("/api/evaluate")
            .json(&form)
            .await
            .assert_status_bad_request();

        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_bodies_are_validation_errors() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::replying(GOOD_FIT_REPLY);
        let server = create_test_server(&mock)?;

        let response = server
            .post("/api/evaluate")
            .bytes("{not json".into())
            .content_type("application/json")
            .await;
        response.assert_status_bad_request();
        assert_error(&response.json::<Value>(), "validation_error");

        let mut form = example_form();
        form["latency"] = json!("instant");
        let response = server.post("/api/evaluate").json(&form).await;
        response.assert_status_bad_request();
        assert_error(&response.json::<Value>(), "validation_error");

        let mut form = example_form();
        form["scale"] = json!("lots");
        let response = server.post("/api/evaluate").json(&form).await;
        response.assert_status_bad_request();

        let response = server.post("/api/evaluate").text("useCase=x").await;
        response.assert_status_bad_request();

        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::replying(GOOD_FIT_REPLY);
        let server = create_test_server(&mock)?;

        let mut form = example_form();
        form["useCase"] = json!("x".repeat(2 * 1024 * 1024));

        let response = server.post("/api/evaluate").json(&form).await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_error(&response.json::<Value>(), "payload_too_large");
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_credential_is_config_error() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::replying(GOOD_FIT_REPLY).without_credentials();
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_internal_server_error();
        let body = response.json::<Value>();
        assert_error(&body, "config_error");
        assert_eq!(
            body["error"],
            "ANTHROPIC_API_KEY is not configured. Please add it to your .env file."
        );

        let response = server
            .post("/api/evaluate")
            .bytes("{not json".into())
            .content_type("application/json")
            .await;
        response.assert_status_internal_server_error();
        assert_error(&response.json::<Value>(), "config_error");

        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn upstream_failures_are_classified() -> anyhow::Result<()> {
        let cases = [
            (
                UpstreamFailure::with_status(401).with_message("invalid x-api-key"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "auth_error",
                "Invalid API key",
            ),
            (
                UpstreamFailure::with_status(429),
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limit_error",
                "Rate limit",
            ),
            (
                UpstreamFailure::with_status(400)
                    .with_nested_message("Your credit balance is too low to access the Anthropic API."),
                StatusCode::BAD_REQUEST,
                "insufficient_credits_error",
                "https://console.anthropic.com/settings/plans",
            ),
            (
                UpstreamFailure::with_status(400).with_message("credit balance exhausted"),
                StatusCode::BAD_REQUEST,
                "insufficient_credits_error",
                "Insufficient API credits",
            ),
            (
                UpstreamFailure::with_status(400).with_message("max_tokens: too large"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "unknown_error",
                "Failed to evaluate request",
            ),
        ];

        for (failure, status, name, needle) in cases {
            let mock = MockCompletionProvider::failing(failure);
            let server = create_test_server(&mock)?;

            let response = server.post("/api/evaluate").json(&example_form()).await;
            response.assert_status(status);

            let body = response.json::<Value>();
            assert_error(&body, name);
            assert!(
                body["error"].as_str().is_some_and(|e| e.contains(needle)),
                "body: {body}"
            );
            assert_eq!(mock.call_count(), 1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn unknown_error_details_follow_runtime_mode() -> anyhow::Result<()> {
        let failure = UpstreamFailure::with_status(503)
            .with_message("upstream overloaded")
            .with_code("overloaded_error");

        let mock = MockCompletionProvider::failing(failure.clone());
        let state = create_test_state(&mock, RuntimeMode::Development);
        let server = create_test_server_with_router(all_routes, state)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_internal_server_error();
        let body = response.json::<Value>();
        assert_eq!(body["apiStatus"], 503);
        assert_eq!(body["details"]["message"], "upstream overloaded");
        assert_eq!(body["details"]["status"], 503);
        assert_eq!(body["details"]["code"], "overloaded_error");

        let mock = MockCompletionProvider::failing(failure);
        let state = create_test_state(&mock, RuntimeMode::Production);
        let server = create_test_server_with_router(all_routes, state)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_internal_server_error();
        let body = response.json::<Value>();
        assert_eq!(body["apiStatus"], 503);
        assert!(body.get("details").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_has_no_api_status() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::failing(UpstreamFailure::transport("connection refused"));
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_internal_server_error();
        let body = response.json::<Value>();
        assert_error(&body, "unknown_error");
        assert!(body.get("apiStatus").is_none());
        assert_eq!(body["details"]["message"], "connection refused");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn slow_upstream_times_out() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::new(MockBehavior::Hang);
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status(StatusCode::GATEWAY_TIMEOUT);
        let body = response.json::<Value>();
        assert_error(&body, "timeout_error");
        assert_eq!(
            body["error"],
            "The evaluation took too long to complete. Please try again."
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn reply_within_budget_succeeds() -> anyhow::Result<()> {
        let mock =
            MockCompletionProvider::replying(GOOD_FIT_REPLY).with_delay(Duration::from_secs(59));
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn prose_reply_falls_back() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::replying("I think Claude would work well here.");
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_ok();

        let result = response.json::<AssessmentResult>();
        assert_eq!(result.recommendation.as_str(), "Possible Fit");
        assert_eq!(
            result.reasoning,
            "I think Claude would work well here...."
        );
        assert_eq!(result.considerations.len(), 4);
        assert_eq!(result.next_steps.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn missing_text_falls_back() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::new(MockBehavior::NoText);
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_ok();

        let result = response.json::<AssessmentResult>();
        assert_eq!(result.reasoning, "...");
        assert_eq!(result.considerations.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn non_integer_scales_are_accepted() -> anyhow::Result<()> {
        let cases = [
            ("500000.0", "500,000"),
            ("1.5e6", "1,500,000"),
            ("2.5", "2.5"),
        ];

        for (scale, rendered) in cases {
            let mock = MockCompletionProvider::replying(GOOD_FIT_REPLY);
            let server = create_test_server(&mock)?;

            let body = format!(
                r#"{{"useCase":"Customer Support Agent","scale":{scale},"latency":"realtime"}}"#
            );
            let response = server
                .post("/api/evaluate")
                .bytes(body.into())
                .content_type("application/json")
                .await;
            response.assert_status_ok();

            assert_eq!(mock.call_count(), 1, "scale {scale}");
            let prompt = mock.last_prompt().unwrap_or_default();
            assert!(
                prompt.contains(&format!("- Projected Scale: {rendered} requests/month")),
                "scale {scale}"
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn malformed_envelope_falls_back() -> anyhow::Result<()> {
        let mock = MockCompletionProvider::new(MockBehavior::Error(CoreKind::UpstreamFormat));
        let server = create_test_server(&mock)?;

        let response = server.post("/api/evaluate").json(&example_form()).await;
        response.assert_status_ok();

        let result = response.json::<AssessmentResult>();
        assert_eq!(result.recommendation.as_str(), "Possible Fit");
        assert_eq!(result.reasoning, "...");
        assert_eq!(result.considerations.len(), 4);
        assert_eq!(result.next_steps.len(), 3);
        assert_eq!(mock.call_count(), 1);
        Ok(())
    }
}
