//! HTML pages for repair guides and the repair catalog.
//!
//! Pages are built in two stages. A view model (`StepsPage`, `CatalogPage`)
//! resolves localized text and image references into plain strings, then a
//! render function writes the HTML, escaping every value on the way out.

mod catalog;
mod escape;
mod layout;
mod steps;

pub use catalog::{
    CardView, CatalogPage, CategoryView, DEFAULT_CATALOG_TITLE, RepairLinkView,
    render_catalog_page,
};
pub use layout::{LanguageLink, PageContext};
pub use steps::{PartView, StepView, StepsPage, render_steps_page};
