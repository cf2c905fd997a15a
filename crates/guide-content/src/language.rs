//! Language allow-list.

use crate::localize::DEFAULT_LANGUAGE;
use crate::Localizer;

/// Languages offered by the site.
pub const DEFAULT_LANGUAGES: [&str; 4] = ["pt", "en", "es", "fr"];

/// A language code taken from a [`Languages`] allow-list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    /// ISO 639-1 code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Fixed allow-list of language codes with a default.
#[derive(Clone, Debug)]
pub struct Languages {
    allowed: Vec<String>,
    default: String,
}

impl Default for Languages {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_LANGUAGES.iter().map(|&c| c.to_owned()).collect(),
            default: DEFAULT_LANGUAGE.to_owned(),
        }
    }
}

impl Languages {
    /// Create an allow-list. Returns `None` if `default` is not allowed.
    #[must_use]
    pub fn new(allowed: Vec<String>, default: String) -> Option<Self> {
        allowed
            .contains(&default)
            .then_some(Self { allowed, default })
    }

    /// Map a requested code onto the allow-list.
    ///
    /// Anything not allowed, including a missing value, silently becomes the default.
    #[must_use]
    pub fn select(&self, requested: Option<&str>) -> Language {
        let code = requested
            .filter(|code| self.allowed.iter().any(|a| a == *code))
            .unwrap_or(self.default.as_str());
        Language(code.to_owned())
    }

    /// The default language.
    #[must_use]
    pub fn default_language(&self) -> Language {
        Language(self.default.clone())
    }

    /// All allowed languages in configured order.
    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.allowed.iter().map(|c| Language(c.clone()))
    }

    /// A [`Localizer`] falling back to this list's default language.
    #[must_use]
    pub fn localizer(&self) -> Localizer {
        Localizer::new(self.default.clone())
    }
}
