//! Repair catalog page.

use std::fmt::Write;

use guide_content::{Catalog, sanitize_listing_image};

use crate::escape;
use crate::layout::{self, LanguageLink, PageContext};

/// Title used when the catalog has none, or could not be loaded.
pub const DEFAULT_CATALOG_TITLE: &str = "Reparações - Suporte Nexled";

/// Link to one guide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairLinkView {
    pub href: String,
    pub label: String,
}

/// A catalog card, ready to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub repairs: Vec<RepairLinkView>,
}

/// A category heading and its cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub cards: Vec<CardView>,
}

/// All data needed to render the catalog page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogPage {
    pub lang: String,
    pub title: String,
    pub categories: Vec<CategoryView>,
    pub languages: Vec<LanguageLink>,
}

impl CatalogPage {
    /// Resolve the catalog for the page language.
    ///
    /// Guide links carry the raw `file` value; it is validated when the guide
    /// itself is requested. Entries without a `file` are dropped.
    #[must_use]
    pub fn build(ctx: &PageContext<'_>, catalog: &Catalog) -> Self {
        let lang = ctx.lang().code();

        let categories = catalog
            .categories
            .iter()
            .map(|category| CategoryView {
                id: category.id.clone().unwrap_or_default(),
                title: ctx.text(category.title.as_ref(), ""),
                cards: category
                    .cards
                    .iter()
                    .map(|card| CardView {
                        image: card
                            .image
                            .as_deref()
                            .and_then(|raw| sanitize_listing_image(raw).src().map(str::to_owned)),
                        title: ctx.text(card.title.as_ref(), ""),
                        description: ctx.text(card.description.as_ref(), ""),
                        repairs: card
                            .repairs
                            .iter()
                            .filter_map(|link| {
                                let file = link.file.as_deref()?;
                                Some(RepairLinkView {
                                    href: layout::href(
                                        "/steps",
                                        &[("file", file), ("lang", lang)],
                                    ),
                                    label: ctx.text(link.label.as_ref(), file),
                                })
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            lang: lang.to_owned(),
            title: ctx.text(catalog.title.as_ref(), DEFAULT_CATALOG_TITLE),
            categories,
            languages: ctx.language_links(|code| layout::href("/repairs", &[("lang", code)])),
        }
    }
}

/// Render the complete catalog page.
#[must_use]
pub fn render_catalog_page(page: &CatalogPage) -> String {
    let mut html = String::with_capacity(8192);

    layout::open_page(&mut html, &page.lang, &page.title, &page.languages);
    let _ = writeln!(html, "<h1>{}</h1>", escape::text(&page.title));

    for category in &page.categories {
        if category.id.is_empty() {
            html.push_str("<section class=\"category\">\n");
        } else {
            let _ = writeln!(
                html,
                "<section class=\"category\" id=\"{}\">",
                escape::attr(&category.id)
            );
        }
        let _ = writeln!(html, "<h2>{}</h2>", escape::text(&category.title));
        html.push_str("<div class=\"grid\">\n");
        for card in &category.cards {
            render_card(&mut html, card);
        }
        html.push_str("</div>\n</section>\n");
    }

    layout::close_page(&mut html, &[]);
    html
}

fn render_card(html: &mut String, card: &CardView) {
    html.push_str("<div class=\"card\">\n");
    if let Some(src) = &card.image {
        let _ = writeln!(
            html,
            "<img src=\"{}\" alt=\"{}\">",
            escape::attr(src),
            escape::attr(&card.title)
        );
    }
    let _ = writeln!(html, "<h3>{}</h3>", escape::text(&card.title));
    let _ = writeln!(html, "<p>{}</p>", escape::text(&card.description));
    if !card.repairs.is_empty() {
        html.push_str("<ul class=\"repair-list\">\n");
        for link in &card.repairs {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                escape::attr(&link.href),
                escape::text(&link.label)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
}
