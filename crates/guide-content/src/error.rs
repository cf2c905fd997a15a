//! Request rejection errors.

use std::path::PathBuf;

/// Reason a document request was rejected.
///
/// Every variant is fatal to the current request. None of them are transient,
/// so callers never retry.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The identifier contains a `..` sequence.
    #[error("Traversal attempt in document identifier: {0}")]
    TraversalAttempt(String),

    /// The identifier's final segment is not a plain `NAME.json` file name.
    #[error("Invalid document name: {0}")]
    InvalidName(String),

    /// The content root does not exist or cannot be canonicalized.
    #[error("Content root unavailable: {}", .0.display())]
    Config(PathBuf),

    /// The document is missing, unreadable, or resolves outside the content root.
    ///
    /// These cases are deliberately indistinguishable.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The document is not valid JSON or its root is not an object.
    #[error("Failed to parse document {}: {message}", path.display())]
    Parse {
        /// Canonical path of the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

impl ContentError {
    /// Whether this rejection was caused by the request rather than the deployment.
    ///
    /// Client errors map to 404, deployment errors to 500.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::TraversalAttempt(_) | Self::InvalidName(_) | Self::NotFound(_)
        )
    }
}
