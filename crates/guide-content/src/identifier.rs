//! Document identifier validation.
//!
//! A document identifier is the client-supplied relative path of a guide,
//! e.g. `DQ/DQ_5.json`. Validation is pure string work; nothing here touches
//! the filesystem. Containment is proven later by
//! [`ContentRoot::resolve`](crate::ContentRoot::resolve).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::ContentError;

/// Grammar for the final path segment.
static BASENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+\.json$").unwrap());

/// A normalized, validated document identifier.
///
/// Subdirectories are allowed. Traversal and malformed leaf names are not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Normalize and validate a raw identifier.
    ///
    /// Backslashes become forward slashes and leading slashes are stripped.
    /// Any `..` sequence is rejected outright, even inside a file name.
    ///
    /// # Example
    ///
    /// ```
    /// use guide_content::DocumentId;
    ///
    /// let id = DocumentId::parse("\\DQ\\DQ_5.json").unwrap();
    /// assert_eq!(id.as_str(), "DQ/DQ_5.json");
    /// assert!(DocumentId::parse("DQ/../../etc/passwd.json").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        let normalized = raw.replace('\\', "/");
        let normalized = normalized.trim_start_matches('/');

        if normalized.contains("..") {
            return Err(ContentError::TraversalAttempt(normalized.to_owned()));
        }

        let basename = normalized.rsplit('/').next().unwrap_or_default();
        if !BASENAME_RE.is_match(basename) {
            return Err(ContentError::InvalidName(normalized.to_owned()));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// The normalized relative path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment (the `NAME.json` part).
    #[must_use]
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
