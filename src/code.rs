//! Pulling a catalog code out of free text.

use std::sync::OnceLock;

use regex::Regex;

/// Code shapes, most specific first. Each pattern captures the code in
/// group 1 and is fenced by non-alphanumerics on both sides.
const PATTERNS: [&str; 4] = [
    // 12345-678
    r"(?i)(?:^|[^a-z0-9])([0-9]{5,}[_-][0-9]{2,5})(?:[^a-z0-9]|$)",
    // ABC-123, 3DSVR-0123
    r"(?i)(?:^|[^a-z0-9])((?:[0-9]*[a-z]+|[a-z]+[0-9]+[a-z]*)[_-][a-z]*[0-9]{2,5})(?:[^0-9]|$)",
    // abc123
    r"(?i)(?:^|[^a-z0-9])([a-z]+[0-9]{3,})(?:[^a-z0-9]|$)",
    // 123456
    r"(?i)(?:^|[^a-z0-9])([0-9]{4,})(?:[^a-z0-9_-]|$)",
];

fn matchers() -> &'static [Regex] {
    static MATCHERS: OnceLock<Vec<Regex>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Finds the first catalog code in `text`, trying shapes in order.
///
/// Em-dashes are read as hyphens. Returns `None` when nothing looks like
/// a code.
pub fn extract_code(text: &str) -> Option<String> {
    let text = text.replace('—', "-");
    matchers()
        .iter()
        .find_map(|matcher| matcher.captures(&text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
