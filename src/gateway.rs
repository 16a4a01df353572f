use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::QueryConfig;
use crate::error::{GuardError, GuardResult};
use crate::server::{QueryRequest, SupportDetails};

/// Transport carrying a query to the service side and returning the raw
/// JSON answer. Failures and malformed answers are indistinguishable to
/// the gateway's retry loop.
#[async_trait::async_trait]
pub trait QueryTransport: Send + Sync {
    async fn send(&self, request: &QueryRequest) -> anyhow::Result<Value>;
}

/// Caller-facing query client with bounded retry and fail-closed defaults.
///
/// Both operations are idempotent and never block the caller beyond the
/// retry/backoff window.
pub struct QueryGateway {
    transport: Arc<dyn QueryTransport>,
    retry: QueryConfig,
}

impl QueryGateway {
    pub fn new(transport: Arc<dyn QueryTransport>, retry: QueryConfig) -> Self {
        Self { transport, retry }
    }

    /// Asks whether `domain` is trusted. Up to `max_attempts` transport
    /// round-trips with linear backoff between them; after exhaustion the
    /// answer is `false`.
    pub async fn query_is_trusted(&self, domain: &str) -> bool {
        let max = self.retry.max_attempts.max(1);
        for attempt in 1..=max {
            match self.attempt_is_trusted(domain).await {
                Ok(trusted) => return trusted,
                Err(e) => {
                    warn!(
                        "Trust query attempt {}/{} for {} failed: {}",
                        attempt, max, domain, e
                    );
                    if attempt < max {
                        let delay = self.retry.base_delay_ms * attempt as u64;
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        warn!(
            "Trust query retries exhausted for {}; treating as untrusted",
            domain
        );
        false
    }

    async fn attempt_is_trusted(&self, domain: &str) -> GuardResult<bool> {
        let request = QueryRequest::IsWhitelisted {
            domain: domain.to_string(),
        };
        let value = self
            .transport
            .send(&request)
            .await
            .map_err(|e| GuardError::InvalidResponse(e.to_string()))?;

        value
            .get("isWhitelisted")
            .and_then(Value::as_bool)
            .ok_or_else(|| GuardError::InvalidResponse("missing isWhitelisted flag".to_string()))
    }

    /// Fetches the display/contact fields. Any transport failure, and any
    /// absent or empty field, falls back to the built-in defaults rather
    /// than surfacing an error.
    pub async fn query_config_fields(&self) -> SupportDetails {
        match self.transport.send(&QueryRequest::GetSupportEmail).await {
            Ok(value) => merge_support_details(&value),
            Err(e) => {
                warn!("Support details query failed: {}; using defaults", e);
                SupportDetails::default()
            }
        }
    }
}

/// HTTP transport posting queries to the service's `/api/query` route.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("PassfieldGuard/1.0")
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build HTTP client"),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl QueryTransport for HttpTransport {
    async fn send(&self, request: &QueryRequest) -> anyhow::Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("unexpected HTTP status {}", response.status());
        }

        Ok(response.json().await?)
    }
}

/// Per-field merge onto the defaults, mirroring the trust-query side's
/// fail-safe posture: a half-formed answer still yields usable strings.
fn merge_support_details(value: &Value) -> SupportDetails {
    let mut details = SupportDetails::default();
    let field = |key: &str, target: &mut String| {
        if let Some(s) = value.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                *target = s.to_string();
            }
        }
    };
    field("supportEmail", &mut details.support_email);
    field("requestButtonTitle", &mut details.request_button_title);
    field("emailSubject", &mut details.email_subject);
    field("emailBody", &mut details.email_body);
    field("hoverText", &mut details.hover_text);
    details
}
