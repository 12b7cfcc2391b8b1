//! Social features: listener chat and song dedications
//!
//! Both services validate and rate-limit locally, persist to the local
//! database, and mirror to the external persistence endpoint when one is
//! configured. Endpoint failures never propagate to callers — the feed
//! keeps working against local state and flags the response as fallback.

pub mod chat;
pub mod dedications;

pub use chat::ChatService;
pub use dedications::DedicationService;

/// Escape HTML-significant characters in user-submitted text
pub(crate) fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_escapes_markup() {
        assert_eq!(
            sanitize("<b>hi</b> & \"there\""),
            "&lt;b&gt;hi&lt;/b&gt; &amp; &quot;there&quot;"
        );
    }

    #[test]
    fn test_sanitize_trims() {
        assert_eq!(sanitize("  hello  "), "hello");
    }
}
