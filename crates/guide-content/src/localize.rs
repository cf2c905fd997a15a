//! Localized text resolution.
//!
//! Returned text is unescaped. Escaping belongs to whoever writes the output
//! format (see `guide-render`).

use crate::LocalizedString;

/// Language used when neither the requested language nor the document has a better match.
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Picks the best text from a [`LocalizedString`].
#[derive(Clone, Debug)]
pub struct Localizer {
    default_language: String,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl Localizer {
    /// Create a localizer that falls back to `default_language`.
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
        }
    }

    /// The fallback language code.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Resolve `node` for `lang`. First match wins:
    ///
    /// 1. `node` absent → `fallback`
    /// 2. non-empty text for `lang`
    /// 3. non-empty text for the default language
    /// 4. first non-empty text in document order
    /// 5. `fallback`
    ///
    /// The default language is tried before enumeration so a document that
    /// only has default-language text never surfaces an unrelated language.
    ///
    /// # Example
    ///
    /// ```
    /// use guide_content::{Localizer, LocalizedString};
    ///
    /// let node: LocalizedString = [("en", "Hello"), ("pt", "Olá")].into_iter().collect();
    /// let localizer = Localizer::default();
    /// assert_eq!(localizer.resolve(Some(&node), "fr", "X"), "Olá");
    /// assert_eq!(localizer.resolve(None, "fr", "X"), "X");
    /// ```
    #[must_use]
    pub fn resolve(&self, node: Option<&LocalizedString>, lang: &str, fallback: &str) -> String {
        let Some(node) = node else {
            return fallback.to_owned();
        };

        node.get(lang)
            .or_else(|| node.get(&self.default_language))
            .or_else(|| node.first_non_empty())
            .unwrap_or(fallback)
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(entries: &[(&str, &str)]) -> LocalizedString {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_requested_language_wins() {
        let n = node(&[("en", "Hello"), ("pt", "Olá")]);
        assert_eq!(Localizer::default().resolve(Some(&n), "en", "X"), "Hello");
    }

    #[test]
    fn test_default_language_before_enumeration() {
        let n = node(&[("en", "Hello"), ("pt", "Olá")]);
        assert_eq!(Localizer::default().resolve(Some(&n), "fr", "X"), "Olá");
    }

    #[test]
    fn test_enumeration_fallback() {
        let n = node(&[("es", "Hola")]);
        assert_eq!(Localizer::default().resolve(Some(&n), "fr", "X"), "Hola");
    }

    #[test]
    fn test_enumeration_skips_empty_values() {
        let n = node(&[("es", ""), ("de", "Hallo")]);
        assert_eq!(Localizer::default().resolve(Some(&n), "fr", "X"), "Hallo");
    }

    #[test]
    fn test_empty_requested_text_falls_through() {
        let n = node(&[("en", ""), ("pt", "Olá")]);
        assert_eq!(Localizer::default().resolve(Some(&n), "en", "X"), "Olá");
    }

    #[test]
    fn test_empty_node_uses_fallback() {
        let n = node(&[]);
        assert_eq!(Localizer::default().resolve(Some(&n), "en", "X"), "X");
    }

    #[test]
    fn test_all_empty_uses_fallback() {
        let n = node(&[("en", ""), ("pt", "")]);
        assert_eq!(Localizer::default().resolve(Some(&n), "en", "X"), "X");
    }

    #[test]
    fn test_absent_node_uses_fallback() {
        assert_eq!(Localizer::default().resolve(None, "en", "X"), "X");
    }

    #[test]
    fn test_text_is_not_escaped() {
        let n = node(&[("en", "<b>Tom & Jerry</b>")]);
        assert_eq!(
            Localizer::default().resolve(Some(&n), "en", ""),
            "<b>Tom & Jerry</b>"
        );
    }

    #[test]
    fn test_custom_default_language() {
        let n = node(&[("es", "Hola"), ("en", "Hello")]);
        let localizer = Localizer::new("en");
        assert_eq!(localizer.default_language(), "en");
        assert_eq!(localizer.resolve(Some(&n), "fr", "X"), "Hello");
    }
}
