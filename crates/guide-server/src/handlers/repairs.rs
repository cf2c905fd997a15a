//! Repair catalog endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use guide_content::{Catalog, ContentError, DocumentId};
use guide_render::{CatalogPage, PageContext, render_catalog_page};

use crate::handlers::{QueryParams, cached_html};
use crate::state::AppState;

/// Handle GET /repairs?lang=.
///
/// A catalog that cannot be loaded renders as an empty page.
#[allow(clippy::unused_async)]
pub(crate) async fn get_repairs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
    headers: HeaderMap,
) -> Response {
    let catalog = load_catalog(&state).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Catalog unavailable, rendering empty catalog");
        Catalog::default()
    });

    let ctx = PageContext::new(&state.languages, query.get("lang"));
    let page = CatalogPage::build(&ctx, &catalog);

    cached_html(&state.version, &headers, render_catalog_page(&page), None)
}

fn load_catalog(state: &AppState) -> Result<Catalog, ContentError> {
    let root = state.content_root()?;
    let id = DocumentId::parse(&state.catalog_document)?;
    Catalog::load(root, &id)
}
