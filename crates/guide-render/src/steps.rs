//! Repair guide page.

use std::fmt::Write;

use guide_content::{DocumentId, ImageResolver, LoadedDocument};

use crate::escape;
use crate::layout::{self, LanguageLink, PageContext};

/// Browser tab title when the document has none.
const UNTITLED: &str = "Untitled";
const DEFAULT_STEP_TITLE: &str = "Switch off the power";
const DEFAULT_STEP_DESCRIPTION: &str =
    "Switch off the power at the electrical panel before starting the intervention";
/// Image shown for steps that do not name one.
const DEFAULT_STEP_IMAGE: &str = "img/power_switch.webp";

/// A part or tool, ready to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartView {
    pub name: String,
    pub sku: Option<String>,
    pub image: Option<String>,
    pub alt: String,
}

/// One numbered step, ready to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepView {
    /// 1-based position.
    pub number: usize,
    pub title: String,
    pub description: String,
    /// Resolved `src`, `None` when no image should render.
    pub image: Option<String>,
    pub image_alt: String,
}

/// All data needed to render a repair guide page.
///
/// Text is unescaped; [`render_steps_page`] escapes on write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepsPage {
    pub lang: String,
    pub page_title: String,
    pub title: String,
    pub estimated_time: String,
    pub parts: Vec<PartView>,
    pub steps: Vec<StepView>,
    pub footer: Vec<(String, String)>,
    pub languages: Vec<LanguageLink>,
    pub catalog_href: String,
}

impl StepsPage {
    /// Resolve every text and image field of `loaded` for the page language.
    #[must_use]
    pub fn build(
        ctx: &PageContext<'_>,
        loaded: &LoadedDocument,
        id: &DocumentId,
        images: &ImageResolver,
    ) -> Self {
        let doc = &loaded.document;
        let lang = ctx.lang().code();
        let image = |raw: Option<&str>, default: &str| {
            images
                .resolve(raw.unwrap_or(default), &loaded.path, id)
                .src()
                .map(str::to_owned)
        };

        let page_title = ctx.text(doc.meta("title_tag").or(doc.title.as_ref()), UNTITLED);
        let title = ctx.text(doc.title.as_ref(), &page_title);

        let parts = doc
            .parts
            .iter()
            .map(|part| PartView {
                name: ctx.text(part.name.as_ref(), ""),
                sku: part.sku.clone(),
                image: image(part.image.as_deref(), ""),
                alt: ctx.text(part.alt.as_ref(), ""),
            })
            .collect();

        let steps = doc
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepView {
                number: i + 1,
                title: ctx.text(step.title.as_ref(), DEFAULT_STEP_TITLE),
                description: ctx.text(step.description.as_ref(), DEFAULT_STEP_DESCRIPTION),
                image: image(step.image.as_deref(), DEFAULT_STEP_IMAGE),
                image_alt: ctx.text(step.image_alt.as_ref(), ""),
            })
            .collect();

        let footer = doc
            .footer
            .iter()
            .map(|(key, value)| (key.clone(), ctx.text(Some(value), "")))
            .filter(|(_, text)| !text.is_empty())
            .collect();

        Self {
            lang: lang.to_owned(),
            estimated_time: ctx.text(doc.meta("tempo_estimado"), ""),
            page_title,
            title,
            parts,
            steps,
            footer,
            languages: ctx.language_links(|code| {
                layout::href("/steps", &[("file", id.as_str()), ("lang", code)])
            }),
            catalog_href: layout::href("/repairs", &[("lang", lang)]),
        }
    }
}

/// Render a complete repair guide page.
#[must_use]
pub fn render_steps_page(page: &StepsPage) -> String {
    let mut html = String::with_capacity(8192);

    layout::open_page(&mut html, &page.lang, &page.page_title, &page.languages);

    html.push_str("<header class=\"hero\">\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape::text(&page.title));
    if !page.estimated_time.is_empty() {
        let _ = writeln!(
            html,
            "<p class=\"estimated-time\">{}</p>",
            escape::text(&page.estimated_time)
        );
    }
    html.push_str("</header>\n");

    render_parts(&mut html, &page.parts);
    render_steps(&mut html, &page.steps);

    let _ = writeln!(
        html,
        "<p><a href=\"{}\" class=\"back\">&larr;</a></p>",
        escape::attr(&page.catalog_href)
    );

    layout::close_page(&mut html, &page.footer);
    html
}

fn render_parts(html: &mut String, parts: &[PartView]) {
    if parts.is_empty() {
        return;
    }
    html.push_str("<section id=\"parts\">\n<ul class=\"parts\">\n");
    for part in parts {
        html.push_str("<li>");
        if let Some(src) = &part.image {
            let _ = write!(
                html,
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                escape::attr(src),
                escape::attr(&part.alt)
            );
        }
        let _ = write!(html, "<span class=\"part-name\">{}</span>", escape::text(&part.name));
        if let Some(sku) = &part.sku {
            let _ = write!(html, " <span class=\"sku\">{}</span>", escape::text(sku));
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n</section>\n");
}

fn render_steps(html: &mut String, steps: &[StepView]) {
    html.push_str("<section id=\"steps\">\n");
    for step in steps {
        html.push_str("<div class=\"step\">\n");
        if let Some(src) = &step.image {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"{}\">",
                escape::attr(src),
                escape::attr(&step.image_alt)
            );
        }
        html.push_str("<div>\n");
        let _ = writeln!(
            html,
            "<h3><span class=\"step-number\">{}.</span> {}</h3>",
            step.number,
            escape::text(&step.title)
        );
        let _ = writeln!(html, "<p>{}</p>", escape::text(&step.description));
        html.push_str("</div>\n</div>\n");
    }
    html.push_str("</section>\n");
}
