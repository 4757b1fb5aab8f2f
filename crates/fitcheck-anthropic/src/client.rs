//! Reqwest-based Messages API client.

use std::sync::Arc;

use fitcheck_core::{
    CancellationToken, CompletionProvider, CompletionRequest, CompletionResponse,
    CompletionService, ServiceHealth,
};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::wire::{self, MessagesRequest};
use crate::{AnthropicConfig, Error, Result, TRACING_TARGET};

/// Path of the Messages API, relative to the base URL.
const MESSAGES_PATH: &str = "v1/messages";

struct AnthropicClientInner {
    http: Client,
    config: AnthropicConfig,
    endpoint: Url,
}

/// Completion provider backed by the Anthropic Messages API.
///
/// Cloning is cheap; clones share one connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use fitcheck_anthropic::{AnthropicClient, AnthropicConfig};
///
/// let config = AnthropicConfig::default().with_api_key("sk-ant-...");
/// let service = AnthropicClient::new(config)?.into_service();
/// ```
#[derive(Clone)]
pub struct AnthropicClient {
    inner: Arc<AnthropicClientInner>,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("config", &self.inner.config)
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Creates a new client with the given configuration.
    ///
    /// A missing API key is not an error here; see [`has_credentials`].
    ///
    /// [`has_credentials`]: CompletionProvider::has_credentials
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let endpoint = messages_endpoint(&config.base_url)?;
        let timeout = config.effective_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis(),
            "Creating Anthropic client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fitcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let has_api_key = config.has_api_key();
        let inner = AnthropicClientInner {
            http,
            config,
            endpoint,
        };

        tracing::info!(
            target: TRACING_TARGET,
            has_api_key,
            "Anthropic client created"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.inner.config
    }

    /// Full URL completions are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Converts this client into a [`CompletionService`].
    pub fn into_service(self) -> CompletionService {
        CompletionService::new(self)
    }

    fn http(&self) -> &Client {
        &self.inner.http
    }
}

/// Joins the Messages API path onto `base_url`, keeping any path prefix.
fn messages_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(MESSAGES_PATH)?)
}

fn cancelled() -> fitcheck_core::Error {
    fitcheck_core::Error::timeout().with_message("completion request cancelled")
}

#[async_trait::async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> fitcheck_core::Result<CompletionResponse> {
        let Some(api_key) = self.config().api_key() else {
            return Err(fitcheck_core::Error::config());
        };

        tracing::debug!(
            target: TRACING_TARGET,
            model = %request.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.chars().count(),
            "Sending messages request"
        );

        let send = self
            .http()
            .post(self.endpoint().clone())
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config().api_version)
            .json(&MessagesRequest::from(request))
            .send();

        let response = cancel
            .run_until_cancelled(send)
            .await
            .ok_or_else(cancelled)?
            .map_err(Error::from)?;

        let status = response.status();
        let body = cancel
            .run_until_cancelled(response.text())
            .await
            .ok_or_else(cancelled)?
            .map_err(Error::from)?;

        if !status.is_success() {
            let failure = wire::parse_failure(status.as_u16(), &body);
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                code = failure.code.as_deref().unwrap_or_default(),
                "Messages request rejected"
            );
            return Err(fitcheck_core::Error::upstream(failure));
        }

        let envelope: Value = serde_json::from_str(&body).map_err(Error::from)?;
        let reply = wire::parse_reply(&envelope);

        tracing::debug!(
            target: TRACING_TARGET,
            has_text = reply.text.is_some(),
            stop_reason = reply.stop_reason.as_deref().unwrap_or_default(),
            "Messages request completed"
        );

        Ok(reply)
    }

    fn has_credentials(&self) -> bool {
        self.config().has_api_key()
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    async fn health_check(&self) -> fitcheck_core::Result<ServiceHealth> {
        if self.has_credentials() {
            Ok(ServiceHealth::healthy())
        } else {
            Ok(ServiceHealth::degraded("ANTHROPIC_API_KEY is not configured"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use fitcheck_core::{ErrorKind, ServiceStatus};
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_stub(router: Router) -> anyhow::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(format!("http://{addr}"))
    }

    fn client(base_url: &str) -> anyhow::Result<AnthropicClient> {
        let config = AnthropicConfig::default()
            .with_api_key("test-key")
            .with_base_url(base_url);
        Ok(AnthropicClient::new(config)?)
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Evaluate this".to_owned(),
            model: "claude-sonnet-4-5-20250929".to_owned(),
            max_tokens: 1000,
        }
    }

    async fn stub_replying(status: StatusCode, body: &'static str) -> anyhow::Result<String> {
        let router = Router::new().route(
            "/v1/messages",
            post(move || async move { (status, body).into_response() }),
        );
        spawn_stub(router).await
    }

    #[test]
    fn endpoint_keeps_path_prefix() -> anyhow::Result<()> {
        assert_eq!(
            messages_endpoint("https://api.anthropic.com")?.as_str(),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            messages_endpoint("http://localhost:8080/proxy")?.as_str(),
            "http://localhost:8080/proxy/v1/messages"
        );
        assert!(messages_endpoint("not a url").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn sends_headers_and_reads_text() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, body: axum::Json<Value>| async move {
                let authorized = headers.get("x-api-key").is_some_and(|v| v == "test-key")
                    && headers
                        .get("anthropic-version")
                        .is_some_and(|v| v == "2023-06-01");
                if !authorized || body["messages"][0]["content"] != "Evaluate this" {
                    return StatusCode::BAD_REQUEST.into_response();
                }
                axum::Json(json!({
                    "model": "claude-sonnet-4-5-20250929",
                    "stop_reason": "end_turn",
                    "content": [{ "type": "text", "text": "{\"recommendation\":\"Good Fit\"}" }],
                    "usage": { "input_tokens": 10, "output_tokens": 20 }
                }))
                .into_response()
            }),
        );
        let base_url = spawn_stub(router).await?;

        let reply = client(&base_url)?
            .complete(&request(), &CancellationToken::new())
            .await?;

        assert_eq!(
            reply.text.as_deref(),
            Some("{\"recommendation\":\"Good Fit\"}")
        );
        assert_eq!(reply.usage.map(|u| u.output_tokens), Some(20));
        Ok(())
    }

    #[tokio::test]
    async fn classifies_rejections() -> anyhow::Result<()> {
        let cases = [
            (
                StatusCode::UNAUTHORIZED,
                r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
                ErrorKind::Auth,
            ),
            (
                StatusCode::TOO_MANY_REQUESTS,
                r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#,
                ErrorKind::RateLimit,
            ),
            (
                StatusCode::BAD_REQUEST,
                r#"{"type":"error","error":{"type":"invalid_request_error","message":"Your credit balance is too low to access the Anthropic API."}}"#,
                ErrorKind::InsufficientCredits,
            ),
            (
                StatusCode::BAD_REQUEST,
                r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens too large"}}"#,
                ErrorKind::Unknown,
            ),
            (
                StatusCode::BAD_REQUEST,
                r#"{"type":"error","error":{"type":"invalid_request_error","error":{"message":"Your credit balance is too low to access the Anthropic API."}}}"#,
                ErrorKind::Unknown,
            ),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream exploded",
                ErrorKind::Unknown,
            ),
        ];

        for (status, body, expected) in cases {
            let base_url = stub_replying(status, body).await?;
            let error = client(&base_url)?
                .complete(&request(), &CancellationToken::new())
                .await
                .unwrap_err();

            assert_eq!(error.kind(), expected, "status {status}");
            assert_eq!(error.upstream_status(), Some(status.as_u16()));
        }
        Ok(())
    }

    #[tokio::test]
    async fn missing_text_is_not_an_error() -> anyhow::Result<()> {
        let base_url = stub_replying(StatusCode::OK, r#"{"content":[]}"#).await?;
        let reply = client(&base_url)?
            .complete(&request(), &CancellationToken::new())
            .await?;
        assert_eq!(reply.text, None);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_reply_is_upstream_format() -> anyhow::Result<()> {
        let base_url = stub_replying(StatusCode::OK, "definitely not json").await?;
        let error = client(&base_url)?
            .complete(&request(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UpstreamFormat);
        Ok(())
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() -> anyhow::Result<()> {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/v1/messages",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { StatusCode::OK }
            }),
        );
        let base_url = spawn_stub(router).await?;

        let client = AnthropicClient::new(AnthropicConfig::default().with_base_url(base_url))?;
        assert!(!client.has_credentials());

        let error = client
            .complete(&request(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let health = client.health_check().await?;
        assert_eq!(health.status, ServiceStatus::Degraded);
        Ok(())
    }

    #[tokio::test]
    async fn cancellation_abandons_request() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                StatusCode::OK
            }),
        );
        let base_url = spawn_stub(router).await?;
        let client = client(&base_url)?;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let error = client.complete(&request(), &cancel).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Timeout);
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_has_no_status() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let error = client(&format!("http://{addr}"))?
            .complete(&request(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Unknown);
        assert_eq!(error.upstream_status(), None);
        Ok(())
    }
}
