/// Opaque asynchronous payload fetch: returns the body text or fails.
/// Implementations own their transport concerns (timeouts included).
#[async_trait::async_trait]
pub trait PayloadFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<String>;
}
