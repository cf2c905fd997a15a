//! Application state.
//!
//! Shared state for all request handlers. Built once at startup and never
//! mutated, so handlers need no locks.

use std::path::PathBuf;

use guide_content::{ContentError, ContentRoot, ImageResolver, Languages};

use crate::ServerConfig;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Canonical content root, `None` when the configured directory is missing.
    content_root: Option<ContentRoot>,
    /// Configured content directory, for error reporting.
    content_dir: PathBuf,
    /// Document served when the request names none.
    pub(crate) default_document: String,
    /// Catalog document identifier.
    pub(crate) catalog_document: String,
    /// Image reference resolver over the project root.
    pub(crate) images: ImageResolver,
    /// Language allow-list.
    pub(crate) languages: Languages,
    /// Web path prefix for served images.
    pub(crate) base_url: String,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}

impl AppState {
    /// Canonicalize roots and build resolvers from `config`.
    pub(crate) fn new(config: &ServerConfig) -> Self {
        let content_root = match ContentRoot::new(&config.content_dir) {
            Ok(root) => Some(root),
            Err(e) => {
                tracing::error!(error = %e, "Content directory unavailable");
                None
            }
        };

        let images = ImageResolver::new(&config.project_root, config.base_url.clone())
            .with_fallbacks(config.image_fallbacks.clone(), config.default_fallback.clone());

        Self {
            content_root,
            content_dir: config.content_dir.clone(),
            default_document: config.default_document.clone(),
            catalog_document: config.catalog_document.clone(),
            images,
            languages: config.languages.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            version: config.version.clone(),
        }
    }

    /// The content root, or [`ContentError::Config`] if it was unavailable at startup.
    pub(crate) fn content_root(&self) -> Result<&ContentRoot, ContentError> {
        self.content_root
            .as_ref()
            .ok_or_else(|| ContentError::Config(self.content_dir.clone()))
    }
}
