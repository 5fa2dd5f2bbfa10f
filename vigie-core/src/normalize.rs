// URL canonicalization applied to the visitor's input before submission

use tracing::warn;
use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Reduces a free-form URL to `scheme://hostname`.
///
/// Absent or blank input gives an empty string. Input without an `http://` or
/// `https://` prefix is treated as HTTPS. Path, query, fragment, port and credentials
/// are dropped. Input that cannot be parsed comes back trimmed and prefixed, unvalidated,
/// so the backend can report the real problem. Applying it twice changes nothing.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return String::new();
    }

    let with_scheme = with_default_scheme(cleaned);
    if let Some(canonical) = scheme_and_host(&with_scheme) {
        return canonical;
    }

    warn!("Could not normalize URL '{}', submitting it as-is", cleaned);
    with_scheme
}

/// Convenience form of [`normalize`] for a present string.
pub fn normalize_url(raw: &str) -> String {
    normalize(Some(raw))
}

/// Whether the input starts with `http://` or `https://`, ignoring case.
pub fn has_http_scheme(input: &str) -> bool {
    let lowered = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

fn with_default_scheme(cleaned: &str) -> String {
    if has_http_scheme(cleaned) {
        cleaned.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, cleaned)
    }
}

fn scheme_and_host(candidate: &str) -> Option<String> {
    let parsed = Url::parse(candidate).ok()?;
    let host = parsed.host_str().filter(|h| !h.is_empty())?;
    Some(format!("{}://{}", parsed.scheme(), host))
}
