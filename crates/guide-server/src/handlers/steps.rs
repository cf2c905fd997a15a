//! Repair guide endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use guide_content::{DocumentId, load_document};
use guide_render::{PageContext, StepsPage, render_steps_page};

use crate::error::ServerError;
use crate::handlers::{QueryParams, cached_html};
use crate::state::AppState;

/// Handle GET /steps?file=&lang=.
#[allow(clippy::unused_async)]
pub(crate) async fn get_steps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let root = state.content_root()?;
    let raw = query.get("file").unwrap_or(&state.default_document);

    let id = DocumentId::parse(raw)?;
    let path = root.resolve(&id)?;
    let loaded = load_document(&path)?;

    let ctx = PageContext::new(&state.languages, query.get("lang"));
    let page = StepsPage::build(&ctx, &loaded, &id, &state.images);

    tracing::debug!(document = %id, lang = ctx.lang().code(), "Rendering guide");

    Ok(cached_html(
        &state.version,
        &headers,
        render_steps_page(&page),
        loaded.modified,
    ))
}
