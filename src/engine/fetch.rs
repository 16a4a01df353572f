use super::traits::PayloadFetcher;
use anyhow::{bail, Context};
use reqwest::Client;
use std::time::Duration;

/// HTTP transport for config and trust-list payloads.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("PassfieldGuard/1.0")
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PayloadFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        if !response.status().is_success() {
            bail!("unexpected HTTP status {} for {}", response.status(), url);
        }

        response
            .text()
            .await
            .with_context(|| format!("read body of {url}"))
    }
}
