use passfield_guard::config::QueryConfig;
use passfield_guard::gateway::{QueryGateway, QueryTransport};
use passfield_guard::server::{QueryRequest, SupportDetails};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Mocks ---

/// Always answers, but never with a boolean trust flag.
struct MalformedTransport {
    attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl QueryTransport for MalformedTransport {
    async fn send(&self, _request: &QueryRequest) -> anyhow::Result<Value> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({ "unexpected": "shape" }))
    }
}

struct ErroringTransport {
    attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl QueryTransport for ErroringTransport {
    async fn send(&self, _request: &QueryRequest) -> anyhow::Result<Value> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("connection reset")
    }
}

/// Fails the first `failures` attempts, then answers `true`.
struct FlakyTransport {
    attempts: AtomicUsize,
    failures: usize,
}

#[async_trait::async_trait]
impl QueryTransport for FlakyTransport {
    async fn send(&self, _request: &QueryRequest) -> anyhow::Result<Value> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            anyhow::bail!("transient failure")
        }
        Ok(serde_json::json!({ "isWhitelisted": true }))
    }
}

fn fast_retry(max_attempts: u32) -> QueryConfig {
    QueryConfig {
        max_attempts,
        base_delay_ms: 1,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_malformed_responses_exhaust_retries_fail_closed() {
    let transport = Arc::new(MalformedTransport {
        attempts: AtomicUsize::new(0),
    });
    let gateway = QueryGateway::new(transport.clone(), fast_retry(3));

    assert!(!gateway.query_is_trusted("example.com").await);
    assert_eq!(
        transport.attempts.load(Ordering::SeqCst),
        3,
        "Exactly max_attempts attempts before failing closed"
    );
}

#[tokio::test]
async fn test_transport_errors_exhaust_retries_fail_closed() {
    let transport = Arc::new(ErroringTransport {
        attempts: AtomicUsize::new(0),
    });
    let gateway = QueryGateway::new(transport.clone(), fast_retry(5));

    assert!(!gateway.query_is_trusted("example.com").await);
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failures() {
    let transport = Arc::new(FlakyTransport {
        attempts: AtomicUsize::new(0),
        failures: 2,
    });
    let gateway = QueryGateway::new(transport.clone(), fast_retry(3));

    assert!(gateway.query_is_trusted("example.com").await);
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_successful_answer_takes_one_attempt() {
    let transport = Arc::new(FlakyTransport {
        attempts: AtomicUsize::new(0),
        failures: 0,
    });
    let gateway = QueryGateway::new(transport.clone(), fast_retry(3));

    assert!(gateway.query_is_trusted("example.com").await);
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_config_fields_fall_back_to_defaults_on_error() {
    let transport = Arc::new(ErroringTransport {
        attempts: AtomicUsize::new(0),
    });
    let gateway = QueryGateway::new(transport, fast_retry(3));

    assert_eq!(gateway.query_config_fields().await, SupportDetails::default());
}

#[tokio::test]
async fn test_config_fields_merge_partial_answer() {
    struct PartialTransport;

    #[async_trait::async_trait]
    impl QueryTransport for PartialTransport {
        async fn send(&self, _request: &QueryRequest) -> anyhow::Result<Value> {
            Ok(serde_json::json!({ "supportEmail": "it@corp.example" }))
        }
    }

    let gateway = QueryGateway::new(Arc::new(PartialTransport), fast_retry(3));
    let details = gateway.query_config_fields().await;

    assert_eq!(details.support_email, "it@corp.example");
    assert_eq!(
        details.hover_text,
        SupportDetails::default().hover_text,
        "Absent fields keep defaults"
    );
}
