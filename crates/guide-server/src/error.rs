//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use guide_content::ContentError;

/// Server error type.
///
/// Responses carry a short plain-text message and never a filesystem path.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Content request rejected.
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl ServerError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Content(ContentError::TraversalAttempt(_) | ContentError::InvalidName(_)) => {
                (StatusCode::NOT_FOUND, "Invalid content.")
            }
            Self::Content(ContentError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Content not found.")
            }
            Self::Content(ContentError::Config(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid configuration: content directory does not exist.",
            ),
            Self::Content(ContentError::Parse { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error reading content file.")
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let Self::Content(e) = &self;
        if e.is_client_error() {
            tracing::warn!(error = %e, "Request rejected");
        } else {
            tracing::error!(error = %e, "Request failed");
        }

        (status, message).into_response()
    }
}
