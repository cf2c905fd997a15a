//! HTML escaping at write time.
//!
//! View models hold raw text; these helpers are the only place it is
//! escaped, so every value written into a page passes through here.

use std::borrow::Cow;

/// Escape text for an element body.
pub(crate) fn text(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

/// Escape a value for a quoted attribute.
pub(crate) fn attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_escapes_markup() {
        assert_eq!(text("<script>"), "&lt;script&gt;");
        assert_eq!(text("a&b"), "a&amp;b");
    }

    #[test]
    fn test_attr_escapes_quotes() {
        let escaped = attr("\"x\" onload='y'");
        assert!(escaped.starts_with("&quot;x&quot;"));
        assert!(!escaped.contains('"'));
        assert!(!escaped.contains('\''));
    }

    #[test]
    fn test_plain_text_borrowed() {
        assert!(matches!(text("Unplug device"), Cow::Borrowed(_)));
    }
}
