//! URL slugs derived from titles.

use std::sync::LazyLock;

use regex::Regex;

/// Derive a lowercase, hyphen-separated slug from a title.
///
/// Drops everything that isn't alphanumeric, whitespace or `-`, turns
/// whitespace runs into single hyphens, collapses repeated hyphens and trims
/// hyphens from both ends. Applying it to its own output is a no-op.
pub fn slugify(title: &str) -> String {
    static WHITESPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
    static HYPHENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = WHITESPACE_RE.replace_all(&kept, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}
