//! URL redaction
//!
//! Click logs keep the path a visitor went to but not the query string or
//! fragment, which routinely carry session tokens and campaign ids.

use regex::Regex;
use std::sync::LazyLock;

static QUERY_OR_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?#].*$").unwrap());

/// Drop everything from the first `?` or `#` onwards.
pub fn redact_url(input: &str) -> String {
    QUERY_OR_FRAGMENT_RE.replace(input, "").into_owned()
}
