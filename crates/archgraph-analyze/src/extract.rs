//! Pull the JSON object out of a model reply.
//!
//! Models wrap JSON in markdown fences or surround it with prose. We take
//! the first fenced block that holds an object, else the span from the
//! first `{` to the last `}`.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n(.*?)```").unwrap());

/// The JSON object text inside `reply`, or `None` if there is no `{...}` span.
pub fn extract_json(reply: &str) -> Option<&str> {
    let trimmed = reply.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    for caps in FENCE_RE.captures_iter(reply) {
        if let Some(body) = caps.get(1) {
            let body = body.as_str().trim();
            if body.starts_with('{') {
                return Some(body);
            }
        }
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}
