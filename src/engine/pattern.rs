/// One entry of the administrator's trust list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPattern {
    /// Raw line as configured, case preserved. Display and audit only.
    pub original: String,
    /// True if the line was written as `*.<base>`.
    pub is_wildcard: bool,
    /// Suffix used for matching. Always starts with `.`, always lowercase,
    /// derived once here and immutable afterwards.
    pub match_suffix: String,
}

/// Parses a trimmed, non-empty, non-comment trust-list line.
///
/// No domain syntax validation: a malformed line simply never matches
/// anything useful. Even the degenerate `*.` parses (suffix `.`) and is
/// handled by the matcher without issue.
pub fn parse_pattern(line: &str) -> TrustPattern {
    let trimmed = line.trim().to_lowercase();
    if let Some(base) = trimmed.strip_prefix("*.") {
        TrustPattern {
            original: line.to_string(),
            is_wildcard: true,
            match_suffix: format!(".{base}"),
        }
    } else {
        TrustPattern {
            original: line.to_string(),
            is_wildcard: false,
            match_suffix: format!(".{trimmed}"),
        }
    }
}
