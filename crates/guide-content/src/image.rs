//! Image reference resolution.
//!
//! Documents reference images by several directory conventions. The resolver
//! maps a raw reference to something the page can use without ever exposing a
//! file outside the project root or honoring a network scheme.
//!
//! Precedence is fixed:
//!
//! 1. empty or scheme reference → hidden
//! 2. absolute web path → trusted as-is
//! 3. file next to the document
//! 4. file in the fallback directory picked by the document name prefix
//! 5. raw passthrough, left for the browser to resolve

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::root::contained_file;
use crate::{DocumentId, ResolvedPath};

/// `scheme:` prefix per RFC 3986.
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Outcome of resolving an image reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedImage {
    /// Do not render an image.
    Hidden,
    /// Absolute web path taken verbatim from a trusted document.
    Absolute(String),
    /// Web path of a file verified to exist under the project root.
    Served(String),
    /// Unresolved relative reference, passed through unchanged.
    Passthrough(String),
}

impl ResolvedImage {
    /// Value for an `src` attribute, or `None` when nothing should render.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::Absolute(s) | Self::Served(s) | Self::Passthrough(s) => Some(s.as_str()),
        }
    }
}

/// Fallback directory used for documents whose file name starts with `prefix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackRule {
    /// File name prefix, compared case-insensitively.
    pub prefix: String,
    /// Directory relative to the project root.
    pub dir: PathBuf,
}

impl FallbackRule {
    pub fn new(prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            dir: dir.into(),
        }
    }

    fn matches(&self, basename: &str) -> bool {
        basename
            .get(..self.prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.prefix))
    }
}

/// Default fallback rules: `DQ_` and `DR_` guides keep images under `repairs/`.
#[must_use]
pub fn default_fallbacks() -> Vec<FallbackRule> {
    vec![
        FallbackRule::new("DQ_", "repairs/DQ"),
        FallbackRule::new("DR_", "repairs/DR"),
    ]
}

/// Default directory for documents matching no rule.
pub const DEFAULT_FALLBACK_DIR: &str = "repairs";

/// Reject empty and scheme-bearing references.
///
/// Returns the cleaned reference (trimmed, NUL characters removed) when it
/// may be used at all.
fn clean_reference(raw: &str) -> Option<String> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != '\0').collect();

    if cleaned.is_empty() || SCHEME_RE.is_match(&cleaned) || cleaned.starts_with("//") {
        return None;
    }
    Some(cleaned)
}

/// Sanitize an image reference without filesystem resolution.
///
/// Used for catalog cards, whose images are never resolved against a document.
#[must_use]
pub fn sanitize_listing_image(raw: &str) -> ResolvedImage {
    match clean_reference(raw) {
        Some(cleaned) if cleaned.starts_with('/') => ResolvedImage::Absolute(cleaned),
        Some(cleaned) => ResolvedImage::Passthrough(cleaned),
        None => ResolvedImage::Hidden,
    }
}

/// Maps image references found in documents to servable URLs.
#[derive(Clone, Debug)]
pub struct ImageResolver {
    /// Canonical project root, `None` when it could not be canonicalized.
    project_root: Option<PathBuf>,
    base_url: String,
    fallbacks: Vec<FallbackRule>,
    default_fallback: PathBuf,
}

impl ImageResolver {
    /// Create a resolver for `project_root` with the default fallback rules.
    ///
    /// `base_url` is the web path the project root is served under (`""` for
    /// the site root). A project root that cannot be canonicalized disables
    /// filesystem resolution; every relative reference then passes through.
    pub fn new(project_root: &Path, base_url: impl Into<String>) -> Self {
        let canonical = project_root.canonicalize().ok();
        if canonical.is_none() {
            tracing::warn!(
                path = %project_root.display(),
                "Project root unavailable, image references will not be resolved"
            );
        }

        Self {
            project_root: canonical,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            fallbacks: default_fallbacks(),
            default_fallback: PathBuf::from(DEFAULT_FALLBACK_DIR),
        }
    }

    /// Replace the fallback rules.
    #[must_use]
    pub fn with_fallbacks(
        mut self,
        rules: Vec<FallbackRule>,
        default_dir: impl Into<PathBuf>,
    ) -> Self {
        self.fallbacks = rules;
        self.default_fallback = default_dir.into();
        self
    }

    /// Canonical project root, if available.
    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Resolve an image reference found in the document at `document`.
    ///
    /// Never fails: bad references degrade to [`ResolvedImage::Hidden`] or
    /// [`ResolvedImage::Passthrough`].
    pub fn resolve(&self, raw: &str, document: &ResolvedPath, id: &DocumentId) -> ResolvedImage {
        let Some(cleaned) = clean_reference(raw) else {
            tracing::debug!(reference = raw, "Image reference hidden");
            return ResolvedImage::Hidden;
        };

        if cleaned.starts_with('/') {
            return ResolvedImage::Absolute(cleaned);
        }

        if let Some(root) = &self.project_root {
            for dir in self.candidate_dirs(document, id, root) {
                if let Some(url) = self.serve_from(&dir.join(&cleaned), root) {
                    tracing::debug!(reference = %cleaned, url = %url, "Image reference resolved");
                    return ResolvedImage::Served(url);
                }
            }
        }

        tracing::debug!(reference = %cleaned, document = %id, "Image reference unresolved");
        ResolvedImage::Passthrough(cleaned)
    }

    /// Directories to try, in order: the document's own directory, then the
    /// fallback directory for the document name.
    fn candidate_dirs(
        &self,
        document: &ResolvedPath,
        id: &DocumentId,
        root: &Path,
    ) -> Vec<PathBuf> {
        let basename = id.basename();
        let fallback = self
            .fallbacks
            .iter()
            .find(|rule| rule.matches(basename))
            .map_or(&self.default_fallback, |rule| &rule.dir);

        vec![document.parent().to_path_buf(), root.join(fallback)]
    }

    /// Web path for `candidate` if it is a file under the project root.
    fn serve_from(&self, candidate: &Path, root: &Path) -> Option<String> {
        let canonical = contained_file(candidate, root)?;
        let relative = canonical.strip_prefix(root).ok()?;
        Some(format!("{}/{}", self.base_url, to_url_path(relative)))
    }
}

/// Join path components with forward slashes.
fn to_url_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::ContentRoot;

    /// Project layout:
    ///
    /// ```text
    /// project/
    ///   data/DQ/DQ_5.json
    ///   data/DQ/img/local.webp
    ///   data/other/X_1.json
    ///   repairs/DQ/img/fallback.webp
    ///   repairs/generic.webp
    ///   secret.png            (outside data/, inside project)
    /// outside.png             (outside project)
    /// ```
    struct Fixture {
        _temp: tempfile::TempDir,
        project: PathBuf,
        resolver: ImageResolver,
        dq: (ResolvedPath, DocumentId),
        other: (ResolvedPath, DocumentId),
    }

    fn fixture(base_url: &str) -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().join("project");
        for dir in ["data/DQ/img", "data/other", "repairs/DQ/img"] {
            fs::create_dir_all(project.join(dir)).unwrap();
        }
        for file in [
            "data/DQ/DQ_5.json",
            "data/other/X_1.json",
        ] {
            fs::write(project.join(file), "{}").unwrap();
        }
        for file in [
            "data/DQ/img/local.webp",
            "repairs/DQ/img/fallback.webp",
            "repairs/generic.webp",
            "secret.png",
        ] {
            fs::write(project.join(file), "img").unwrap();
        }
        fs::write(temp.path().join("outside.png"), "img").unwrap();

        let root = ContentRoot::new(project.join("data")).unwrap();
        let dq_id = DocumentId::parse("DQ/DQ_5.json").unwrap();
        let other_id = DocumentId::parse("other/X_1.json").unwrap();

        Fixture {
            resolver: ImageResolver::new(&project, base_url),
            dq: (root.resolve(&dq_id).unwrap(), dq_id),
            other: (root.resolve(&other_id).unwrap(), other_id),
            project,
            _temp: temp,
        }
    }

    impl Fixture {
        fn dq(&self, raw: &str) -> ResolvedImage {
            self.resolver.resolve(raw, &self.dq.0, &self.dq.1)
        }

        fn other(&self, raw: &str) -> ResolvedImage {
            self.resolver.resolve(raw, &self.other.0, &self.other.1)
        }
    }

    #[test]
    fn test_empty_reference_hidden() {
        let f = fixture("");
        assert_eq!(f.dq(""), ResolvedImage::Hidden);
        assert_eq!(f.dq("   "), ResolvedImage::Hidden);
        assert_eq!(f.dq("\0"), ResolvedImage::Hidden);
    }

    #[test]
    fn test_scheme_references_hidden() {
        let f = fixture("");
        for raw in [
            "http://evil.example/x.png",
            "https://evil.example/x.png",
            "data:image/png;base64,AAAA",
            "javascript:alert(1)",
            "  JaVaScRiPt:alert(1)",
            "java\0script:alert(1)",
            "//evil.example/x.png",
            "c:/windows/x.png",
        ] {
            assert_eq!(f.dq(raw), ResolvedImage::Hidden, "{raw:?}");
        }
    }

    #[test]
    fn test_absolute_path_trusted() {
        let f = fixture("");
        assert_eq!(
            f.dq("/img/ok.webp"),
            ResolvedImage::Absolute("/img/ok.webp".to_owned())
        );
        // Not checked against the filesystem.
        assert_eq!(
            f.dq("/does/not/exist.webp"),
            ResolvedImage::Absolute("/does/not/exist.webp".to_owned())
        );
    }

    #[test]
    fn test_document_relative_resolution() {
        let f = fixture("");
        assert_eq!(
            f.dq("img/local.webp"),
            ResolvedImage::Served("/data/DQ/img/local.webp".to_owned())
        );
    }

    #[test]
    fn test_base_url_prefix() {
        let f = fixture("/support/");
        assert_eq!(
            f.dq("img/local.webp"),
            ResolvedImage::Served("/support/data/DQ/img/local.webp".to_owned())
        );
    }

    #[test]
    fn test_prefix_fallback_directory() {
        let f = fixture("");
        assert_eq!(
            f.dq("img/fallback.webp"),
            ResolvedImage::Served("/repairs/DQ/img/fallback.webp".to_owned())
        );
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let rule = FallbackRule::new("DQ_", "repairs/DQ");
        assert!(rule.matches("dq_5.json"));
        assert!(!rule.matches("DQ"));
        assert!(!rule.matches("XDQ_5.json"));
    }

    #[test]
    fn test_generic_fallback_directory() {
        let f = fixture("");
        assert_eq!(
            f.other("generic.webp"),
            ResolvedImage::Served("/repairs/generic.webp".to_owned())
        );
        // DQ documents only look in their own fallback directory.
        assert_eq!(
            f.dq("generic.webp"),
            ResolvedImage::Passthrough("generic.webp".to_owned())
        );
    }

    #[test]
    fn test_document_directory_takes_precedence() {
        let f = fixture("");
        fs::create_dir_all(f.project.join("repairs/DQ/img")).unwrap();
        fs::write(f.project.join("repairs/DQ/img/local.webp"), "img").unwrap();

        assert_eq!(
            f.dq("img/local.webp"),
            ResolvedImage::Served("/data/DQ/img/local.webp".to_owned())
        );
    }

    #[test]
    fn test_inside_project_outside_content_is_served() {
        let f = fixture("");
        assert_eq!(
            f.dq("../../secret.png"),
            ResolvedImage::Served("/secret.png".to_owned())
        );
    }

    #[test]
    fn test_outside_project_passes_through_raw() {
        let f = fixture("");
        let raw = "../../../outside.png";
        let resolved = f.dq(raw);

        assert_eq!(resolved, ResolvedImage::Passthrough(raw.to_owned()));
        assert!(!resolved.src().unwrap().contains(&*f.project.to_string_lossy()));
    }

    #[test]
    fn test_missing_file_passes_through() {
        let f = fixture("");
        assert_eq!(
            f.dq("  img/missing.webp  "),
            ResolvedImage::Passthrough("img/missing.webp".to_owned())
        );
    }

    #[test]
    fn test_directory_is_not_served() {
        let f = fixture("");
        assert_eq!(f.dq("img"), ResolvedImage::Passthrough("img".to_owned()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_project_passes_through() {
        let f = fixture("");
        let outside = f.project.parent().unwrap().join("outside.png");
        std::os::unix::fs::symlink(&outside, f.project.join("data/DQ/img/link.png")).unwrap();

        assert_eq!(
            f.dq("img/link.png"),
            ResolvedImage::Passthrough("img/link.png".to_owned())
        );
    }

    #[test]
    fn test_custom_fallbacks() {
        let f = fixture("");
        let resolver = f
            .resolver
            .clone()
            .with_fallbacks(vec![FallbackRule::new("X_", "repairs")], "nowhere");

        assert_eq!(
            resolver.resolve("generic.webp", &f.other.0, &f.other.1),
            ResolvedImage::Served("/repairs/generic.webp".to_owned())
        );
        assert_eq!(
            resolver.resolve("img/fallback.webp", &f.dq.0, &f.dq.1),
            ResolvedImage::Passthrough("img/fallback.webp".to_owned())
        );
    }

    #[test]
    fn test_missing_project_root_passes_through() {
        let f = fixture("");
        let resolver = ImageResolver::new(&f.project.join("missing"), "");

        assert!(resolver.project_root().is_none());
        assert_eq!(
            resolver.resolve("img/local.webp", &f.dq.0, &f.dq.1),
            ResolvedImage::Passthrough("img/local.webp".to_owned())
        );
    }

    #[test]
    fn test_src() {
        assert_eq!(ResolvedImage::Hidden.src(), None);
        assert_eq!(ResolvedImage::Served("/a.png".to_owned()).src(), Some("/a.png"));
    }

    #[test]
    fn test_sanitize_listing_image() {
        assert_eq!(sanitize_listing_image("http://x/y.png"), ResolvedImage::Hidden);
        assert_eq!(sanitize_listing_image(""), ResolvedImage::Hidden);
        assert_eq!(
            sanitize_listing_image("/img/a.png"),
            ResolvedImage::Absolute("/img/a.png".to_owned())
        );
        assert_eq!(
            sanitize_listing_image(" img/a.png "),
            ResolvedImage::Passthrough("img/a.png".to_owned())
        );
    }
}
