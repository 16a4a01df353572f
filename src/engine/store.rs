use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

use super::matcher;
use super::pattern::{parse_pattern, TrustPattern};
use crate::config::TrustConfig;

/// Process-wide holder of the current trust patterns and configuration.
///
/// Single writer (the `ConfigLoader`), lock-free readers. Updates are
/// whole-set replacements via an atomic pointer swap, so a reader never
/// observes a partially-updated list.
pub struct TrustStore {
    patterns: ArcSwap<Vec<TrustPattern>>,
    config: ArcSwap<TrustConfig>,
}

impl TrustStore {
    pub fn new() -> Self {
        Self {
            patterns: ArcSwap::from_pointee(Vec::new()),
            config: ArcSwap::from_pointee(TrustConfig::default()),
        }
    }

    /// Parses the given trust-list lines and swaps in the full new set.
    /// Blank lines and `#` comments are skipped.
    pub fn replace_patterns<'a>(&self, lines: impl IntoIterator<Item = &'a str>) {
        let patterns: Vec<TrustPattern> = lines
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(parse_pattern)
            .collect();

        info!("Loaded {} trust patterns", patterns.len());
        self.patterns.store(Arc::new(patterns));
    }

    /// Fail-closed transition: swap in an empty set.
    pub fn clear_patterns(&self) {
        self.patterns.store(Arc::new(Vec::new()));
    }

    pub fn set_config(&self, config: TrustConfig) {
        self.config.store(Arc::new(config));
    }

    /// Current immutable view of patterns and configuration. Never blocks.
    pub fn snapshot(&self) -> (Arc<Vec<TrustPattern>>, Arc<TrustConfig>) {
        (self.patterns.load_full(), self.config.load_full())
    }

    pub fn config(&self) -> Arc<TrustConfig> {
        self.config.load_full()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.load().len()
    }

    pub fn is_trusted(&self, domain: &str) -> bool {
        matcher::is_trusted(domain, &self.patterns.load())
    }
}

impl Default for TrustStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_filters_comments_and_blanks() {
        let store = TrustStore::new();
        store.replace_patterns(vec![
            "example.com",
            "# a comment",
            "",
            "   ",
            "  *.corp.example.org  ",
        ]);
        assert_eq!(store.pattern_count(), 2);
    }

    #[test]
    fn test_end_to_end_matching() {
        let store = TrustStore::new();
        store.replace_patterns(vec!["example.com", "*.corp.example.org", "# comment", ""]);

        assert!(store.is_trusted("example.com"));
        assert!(store.is_trusted("www.example.com"));
        assert!(!store.is_trusted("corp.example.org"));
        assert!(store.is_trusted("a.corp.example.org"));
        assert!(!store.is_trusted("evil.com"));
    }

    #[test]
    fn test_empty_store_fails_closed() {
        let store = TrustStore::new();
        assert!(!store.is_trusted("example.com"));
    }

    #[test]
    fn test_snapshot_unaffected_by_later_replace() {
        let store = TrustStore::new();
        store.replace_patterns(vec!["example.com"]);
        let (before, _) = store.snapshot();

        store.replace_patterns(vec!["other.com", "third.com"]);

        // The earlier snapshot still sees the complete old set.
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].match_suffix, ".example.com");
        assert_eq!(store.pattern_count(), 2);
    }

    #[test]
    fn test_clear_patterns() {
        let store = TrustStore::new();
        store.replace_patterns(vec!["example.com"]);
        store.clear_patterns();
        assert_eq!(store.pattern_count(), 0);
        assert!(!store.is_trusted("example.com"));
    }
}
