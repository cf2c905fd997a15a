//! Page chrome shared by every page: document head, language switcher, footer.

use std::fmt::Write;

use guide_content::{Language, Languages, LocalizedString, Localizer};

use crate::escape;

/// Stylesheet inlined into every page.
const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;color:#111;background:#fff}\
header,footer{display:flex;justify-content:space-between;align-items:center;padding:16px 32px}\
main{max-width:1100px;margin:0 auto;padding:0 32px 64px}\
nav.languages a{margin-left:8px;color:#555;text-decoration:none}\
nav.languages a.active{color:#111;font-weight:600}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:24px}\
.card,.step{border:1px solid #ddd;border-radius:12px;padding:16px}\
.step{display:flex;gap:32px;margin-bottom:24px}\
.step img{width:48%;aspect-ratio:16/10;object-fit:cover;border-radius:8px}\
.card img{width:100%;border-radius:8px}";

/// Requested language plus the text resolution that goes with it.
#[derive(Debug)]
pub struct PageContext<'a> {
    languages: &'a Languages,
    lang: Language,
    localizer: Localizer,
}

impl<'a> PageContext<'a> {
    /// Select the page language from a raw request value.
    #[must_use]
    pub fn new(languages: &'a Languages, requested: Option<&str>) -> Self {
        Self {
            languages,
            lang: languages.select(requested),
            localizer: languages.localizer(),
        }
    }

    /// Language the page renders in.
    #[must_use]
    pub fn lang(&self) -> &Language {
        &self.lang
    }

    /// Resolve localized text for this page's language.
    pub(crate) fn text(&self, node: Option<&LocalizedString>, fallback: &str) -> String {
        self.localizer.resolve(node, self.lang.code(), fallback)
    }

    /// One link per allowed language, built by `href`.
    pub(crate) fn language_links(&self, href: impl Fn(&str) -> String) -> Vec<LanguageLink> {
        self.languages
            .iter()
            .map(|lang| LanguageLink {
                href: href(lang.code()),
                is_active: lang == self.lang,
                code: lang.code().to_owned(),
            })
            .collect()
    }
}

/// Link to the current page in another language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageLink {
    pub code: String,
    pub href: String,
    pub is_active: bool,
}

/// Build `path?query` from unencoded parameters.
pub(crate) fn href(path: &str, params: &[(&str, &str)]) -> String {
    match serde_urlencoded::to_string(params) {
        Ok(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path.to_owned(),
    }
}

/// Write everything up to and including the opening `<main>`.
pub(crate) fn open_page(html: &mut String, lang: &str, title: &str, languages: &[LanguageLink]) {
    html.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(html, "<html lang=\"{}\">", escape::attr(lang));
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape::text(title));
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    let _ = writeln!(
        html,
        "<a href=\"{}\" class=\"brand\">Nexled</a>",
        escape::attr(&href("/repairs", &[("lang", lang)]))
    );
    render_language_nav(html, languages);
    html.push_str("</header>\n<main>\n");
}

/// Close `<main>`, write the footer and end the document.
pub(crate) fn close_page(html: &mut String, footer: &[(String, String)]) {
    html.push_str("</main>\n<footer>\n");
    for (key, text) in footer {
        let _ = writeln!(
            html,
            "<p class=\"footer-{}\">{}</p>",
            escape::attr(key),
            escape::text(text)
        );
    }
    html.push_str("</footer>\n</body>\n</html>\n");
}

fn render_language_nav(html: &mut String, links: &[LanguageLink]) {
    if links.is_empty() {
        return;
    }
    html.push_str("<nav class=\"languages\" aria-label=\"Language\">\n");
    for link in links {
        let class = if link.is_active { " class=\"active\"" } else { "" };
        let _ = writeln!(
            html,
            "<a href=\"{}\" hreflang=\"{}\"{}>{}</a>",
            escape::attr(&link.href),
            escape::attr(&link.code),
            class,
            escape::text(&link.code.to_uppercase()),
        );
    }
    html.push_str("</nav>\n");
}
