//! Sandboxed document resolution for repair guides.
//!
//! Takes a client-controlled "which document" and "which language" request,
//! maps it to exactly one file under a fixed content root, and maps every image
//! reference inside the document to a safe, servable path.
//!
//! # Pipeline
//!
//! ```text
//! raw id ──► DocumentId::parse ──► ContentRoot::resolve ──► load_document
//!                                                             │
//!                        Localizer::resolve ◄── text fields ◄─┤
//!                     ImageResolver::resolve ◄── images ◄─────┘
//! ```
//!
//! Roots are passed in explicitly; nothing here reads global state. Returned
//! text and paths are unescaped, so the caller escapes for its output format.
//!
//! # Example
//!
//! ```no_run
//! use guide_content::{ContentRoot, DocumentId, ImageResolver, Languages, load_document};
//! use std::path::Path;
//!
//! let root = ContentRoot::new("site/data")?;
//! let id = DocumentId::parse("DQ/DQ_5.json")?;
//! let loaded = load_document(&root.resolve(&id)?)?;
//!
//! let languages = Languages::default();
//! let lang = languages.select(Some("en"));
//! let title = languages
//!     .localizer()
//!     .resolve(loaded.document.title.as_ref(), lang.code(), "Untitled");
//!
//! let images = ImageResolver::new(Path::new("site"), "");
//! for step in &loaded.document.steps {
//!     let image = images.resolve(step.image.as_deref().unwrap_or(""), &loaded.path, &id);
//!     println!("{title}: {:?}", image.src());
//! }
//! # Ok::<(), guide_content::ContentError>(())
//! ```

mod catalog;
mod document;
mod error;
mod identifier;
mod image;
mod language;
mod localize;
mod root;

pub use catalog::{Catalog, CatalogCard, CatalogCategory, RepairLink};
pub use document::{
    ContentDocument, LoadedDocument, LocalizedString, PartEntry, StepEntry, load_document,
};
pub use error::ContentError;
pub use identifier::DocumentId;
pub use image::{
    DEFAULT_FALLBACK_DIR, FallbackRule, ImageResolver, ResolvedImage, default_fallbacks,
    sanitize_listing_image,
};
pub use language::{DEFAULT_LANGUAGES, Language, Languages};
pub use localize::{DEFAULT_LANGUAGE, Localizer};
pub use root::{ContentRoot, ResolvedPath, contained_file};
