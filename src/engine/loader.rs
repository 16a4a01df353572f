use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, OnceCell};
use tracing::{error, info, warn};

use super::store::TrustStore;
use super::traits::PayloadFetcher;
use crate::config::TrustConfig;
use crate::error::{GuardError, GuardResult};

/// Observable lifecycle of the one-per-process load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

const STATE_UNLOADED: u8 = 0;
const STATE_LOADING: u8 = 1;
const STATE_LOADED: u8 = 2;
const STATE_FAILED: u8 = 3;

/// Fetches the bootstrap configuration and trust list, populates the
/// `TrustStore`, and keeps the list fresh on a recurring timer.
///
/// `load()` is single-flight: concurrent callers attach to the same
/// in-flight outcome via a `OnceCell`, so the underlying fetches run at
/// most once per process no matter how many callers race. The loader is
/// the sole mutator of the store.
pub struct ConfigLoader {
    inner: Arc<LoaderInner>,
}

struct LoaderInner {
    store: Arc<TrustStore>,
    fetcher: Arc<dyn PayloadFetcher>,
    /// Location of the bootstrap configuration payload.
    config_url: String,
    /// Base that relative whitelist URLs are resolved against.
    base_url: Option<String>,
    state: AtomicU8,
    outcome: OnceCell<Result<(), Arc<GuardError>>>,
    stop: Notify,
}

impl ConfigLoader {
    pub fn new(
        store: Arc<TrustStore>,
        fetcher: Arc<dyn PayloadFetcher>,
        config_url: String,
        base_url: Option<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(LoaderInner {
                store,
                fetcher,
                config_url,
                base_url,
                state: AtomicU8::new(STATE_UNLOADED),
                outcome: OnceCell::new(),
                stop: Notify::new(),
            }),
        })
    }

    pub fn state(&self) -> LoadState {
        match self.inner.state.load(Ordering::SeqCst) {
            STATE_LOADING => LoadState::Loading,
            STATE_LOADED => LoadState::Loaded,
            STATE_FAILED => LoadState::Failed,
            _ => LoadState::Unloaded,
        }
    }

    /// Runs the load sequence exactly once; every caller (first or
    /// subsequent, concurrent or not) observes the same outcome. After this
    /// resolves the store holds a fully-consistent snapshot: either the
    /// loaded configuration and patterns, or defaults and an empty set.
    pub async fn load(&self) -> Result<(), Arc<GuardError>> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .outcome
            .get_or_init(move || async move {
                inner.state.store(STATE_LOADING, Ordering::SeqCst);
                match LoaderInner::load_sequence(&inner).await {
                    Ok(()) => {
                        inner.state.store(STATE_LOADED, Ordering::SeqCst);
                        info!("Config and trust list fully loaded");
                        Ok(())
                    }
                    Err(e) => {
                        error!("Initial load failed: {}", e);
                        inner.store.clear_patterns();
                        inner.state.store(STATE_FAILED, Ordering::SeqCst);
                        Err(Arc::new(e))
                    }
                }
            })
            .await
            .clone()
    }

    /// Out-of-band refresh, e.g. triggered via the API. Ensures the
    /// initial load has resolved first.
    pub async fn refresh_now(&self) -> Result<(), Arc<GuardError>> {
        self.load().await?;
        if let Err(e) = self.inner.refresh_list().await {
            error!("Forced trust list refresh failed: {}", e);
            self.inner.store.clear_patterns();
            return Err(Arc::new(e));
        }
        Ok(())
    }

    /// Stops the recurring refresh task. Queries keep working against the
    /// last swapped-in snapshot.
    pub fn shutdown(&self) {
        self.inner.stop.notify_one();
    }
}

impl LoaderInner {
    async fn load_sequence(inner: &Arc<Self>) -> GuardResult<()> {
        let text = inner
            .fetcher
            .fetch(&inner.config_url)
            .await
            .map_err(|e| GuardError::ConfigFetch(e.to_string()))?;
        let config = TrustConfig::from_bootstrap(&text)?;

        let interval_ms = config.refresh_interval_ms;
        let has_list = !config.whitelist_url.is_empty();
        inner.store.set_config(config);

        if !has_list {
            warn!("No whitelistUrl in bootstrap config; trust list stays empty");
            return Ok(());
        }

        inner.refresh_list().await?;
        Self::spawn_refresh(Arc::clone(inner), interval_ms);
        Ok(())
    }

    /// Fetches the trust list and swaps the store's pattern set.
    async fn refresh_list(&self) -> GuardResult<()> {
        let config = self.store.config();
        if config.whitelist_url.is_empty() {
            return Err(GuardError::ListFetch(
                "no whitelist URL configured".to_string(),
            ));
        }

        let url = resolve_source_url(self.base_url.as_deref(), &config.whitelist_url);
        info!("Loading trust list from {}", url);

        let text = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| GuardError::ListFetch(e.to_string()))?;

        self.store.replace_patterns(text.lines());
        Ok(())
    }

    /// Recurring refresh task. A failing tick clears the pattern set
    /// (fail closed) but never stops the timer or reverts the load state.
    fn spawn_refresh(inner: Arc<Self>, interval_ms: u64) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
            // The first tick completes immediately and the list was just
            // loaded, so consume it before the loop.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = inner.stop.notified() => {
                        info!("Trust list refresh task stopped");
                        return;
                    }
                }

                if let Err(e) = inner.refresh_list().await {
                    error!("Error refreshing trust list: {}", e);
                    inner.store.clear_patterns();
                }
            }
        });
    }
}

fn resolve_source_url(base: Option<&str>, url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else if let Some(base) = base {
        format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
    } else {
        url.to_string()
    }
}
