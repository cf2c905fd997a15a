//! Image file serving.
//!
//! Serves files from the project root under the configured base URL. Only
//! files whose MIME type is `image/*` are served, and only after the
//! canonical path is confirmed to lie inside the project root, so documents
//! and configuration next to the images stay private.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use guide_content::contained_file;
use percent_encoding::percent_decode_str;

use crate::state::AppState;

/// Create router for image serving as the fallback route.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().fallback(serve_image)
}

/// Serve an image under the project root, or 404.
async fn serve_image(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response {
    let Some(path) = image_path(&state, req.uri().path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        tracing::debug!(path = %path.display(), mime = %mime, "Refusing non-image file");
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(&path).await {
        Ok(content) => ([(header::CONTENT_TYPE, mime.to_string())], content).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Map a request path to a canonical file inside the project root.
fn image_path(state: &AppState, uri_path: &str) -> Option<PathBuf> {
    let root = state.images.project_root()?;

    let relative = if state.base_url.is_empty() {
        uri_path
    } else {
        uri_path.strip_prefix(&state.base_url)?
    };
    if !relative.starts_with('/') {
        return None;
    }

    let decoded = percent_decode_str(relative).decode_utf8().ok()?;
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() || relative.contains('\0') || relative.contains('\\') {
        return None;
    }

    contained_file(&root.join(relative), root)
}
