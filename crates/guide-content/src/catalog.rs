//! Repair catalog.
//!
//! The catalog lists repair categories, each with cards linking to guides.
//! Unlike guides, a broken catalog never fails the request: callers fall back
//! to [`Catalog::default`].

use serde_json::Value;

use crate::document::{array, localized, read_json_object, string};
use crate::{ContentError, ContentRoot, DocumentId, LocalizedString};

/// Link from a card to one guide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairLink {
    /// Raw document identifier. Validated only when the guide is requested.
    pub file: Option<String>,
    pub label: Option<LocalizedString>,
}

/// A card within a category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogCard {
    /// Raw, untrusted image reference.
    pub image: Option<String>,
    pub title: Option<LocalizedString>,
    pub description: Option<LocalizedString>,
    pub repairs: Vec<RepairLink>,
}

/// A group of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogCategory {
    pub id: Option<String>,
    pub title: Option<LocalizedString>,
    pub cards: Vec<CatalogCard>,
}

/// Parsed catalog document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub title: Option<LocalizedString>,
    pub categories: Vec<CatalogCategory>,
}

impl Catalog {
    /// Resolve and parse the catalog document inside `root`.
    pub fn load(root: &ContentRoot, id: &DocumentId) -> Result<Self, ContentError> {
        let path = root.resolve(id)?;
        let map = read_json_object(path.as_path())?;

        Ok(Self {
            title: map
                .get("meta")
                .and_then(|meta| localized(meta.get("title"))),
            categories: array(map.get("categories")).map(category).collect(),
        })
    }
}

fn category(value: &Value) -> CatalogCategory {
    CatalogCategory {
        id: string(value.get("id")),
        title: localized(value.get("title")),
        cards: array(value.get("cards")).map(card).collect(),
    }
}

fn card(value: &Value) -> CatalogCard {
    CatalogCard {
        image: string(value.get("image")),
        title: localized(value.get("title")),
        description: localized(value.get("description")),
        repairs: array(value.get("repairs"))
            .map(|r| RepairLink {
                file: string(r.get("file")),
                label: localized(r.get("label")),
            })
            .collect(),
    }
}
