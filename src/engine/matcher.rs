use super::pattern::TrustPattern;
use tracing::debug;

/// Checks one domain against one pattern. The domain must already be
/// lowercase; matching is case-insensitive by construction.
///
/// Wildcard (`*.example.com`): the domain must end with the suffix and
/// have at least one label before it, so the bare `example.com` does NOT
/// match. Non-wildcard (`example.com`): exact bare-domain match, or a
/// suffix match with a non-empty prefix (bare entries implicitly trust
/// their subdomains).
pub fn matches_pattern(domain: &str, pattern: &TrustPattern) -> bool {
    let suffix = pattern.match_suffix.as_str();
    if pattern.is_wildcard {
        domain.ends_with(suffix) && domain.len() > suffix.len()
    } else {
        domain == &suffix[1..] || (domain.ends_with(suffix) && domain.len() > suffix.len())
    }
}

/// True iff any pattern matches. An empty pattern set always yields false:
/// uncertainty resolves to "not trusted".
pub fn is_trusted(domain: &str, patterns: &[TrustPattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let domain_lower = domain.to_lowercase();
    patterns.iter().any(|pattern| {
        let matched = matches_pattern(&domain_lower, pattern);
        if matched {
            debug!("{} matches trust pattern {}", domain, pattern.original);
        }
        matched
    })
}
