//! `guide check` command implementation.

use std::path::PathBuf;

use clap::Args;
use guide_config::Config;
use guide_content::{
    ContentRoot, DocumentId, ImageResolver, LoadedDocument, ResolvedImage, load_document,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover guide.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document identifier (default: `content.default_document`).
    #[arg(long)]
    file: Option<String>,

    /// Language code.
    #[arg(long)]
    lang: Option<String>,

    /// Enable verbose output (DEBUG-level logging of each resolution step).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where one image reference ended up.
#[derive(Debug)]
struct ImageDecision {
    /// Field the reference came from, e.g. `steps[0]`.
    field: String,
    raw: String,
    resolved: ResolvedImage,
}

/// Outcome of running one document through the pipeline.
#[derive(Debug)]
struct CheckReport {
    id: DocumentId,
    path: PathBuf,
    lang: String,
    title: String,
    images: Vec<ImageDecision>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the document is rejected.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let report = check_document(&config, self.file.as_deref(), self.lang.as_deref())?;

        output.highlight(&format!("{} ({})", report.id, report.lang));
        output.info(&format!("Path: {}", report.path.display()));
        output.info(&format!("Title: {}", report.title));
        for image in &report.images {
            output.image_decision(&image.field, &image.raw, &image.resolved);
        }
        output.success("OK");

        Ok(())
    }
}

/// Validate, resolve and load one document, then resolve its images.
fn check_document(
    config: &Config,
    file: Option<&str>,
    lang: Option<&str>,
) -> Result<CheckReport, CliError> {
    let content = &config.content_resolved;
    let languages = config.languages.to_languages()?;
    let lang = languages.select(lang);

    let id = DocumentId::parse(file.unwrap_or(&content.default_document))?;
    let root = ContentRoot::new(content.content_dir())?;
    let loaded = load_document(&root.resolve(&id)?)?;
    tracing::debug!(document = %id, lang = lang.code(), "Document loaded");

    let images = ImageResolver::new(&content.project_root, content.base_url.clone())
        .with_fallbacks(config.images.rules(), &config.images.default_fallback);

    Ok(CheckReport {
        path: loaded.path.as_path().to_path_buf(),
        lang: lang.code().to_owned(),
        title: languages
            .localizer()
            .resolve(loaded.document.title.as_ref(), lang.code(), ""),
        images: image_decisions(&loaded, &id, &images),
        id,
    })
}

fn image_decisions(
    loaded: &LoadedDocument,
    id: &DocumentId,
    images: &ImageResolver,
) -> Vec<ImageDecision> {
    let doc = &loaded.document;
    let parts = doc
        .parts
        .iter()
        .enumerate()
        .filter_map(|(i, part)| Some((format!("parts[{i}]"), part.image.as_deref()?)));
    let steps = doc
        .steps
        .iter()
        .enumerate()
        .filter_map(|(i, step)| Some((format!("steps[{i}]"), step.image.as_deref()?)));

    parts
        .chain(steps)
        .map(|(field, raw)| ImageDecision {
            resolved: images.resolve(raw, &loaded.path, id),
            raw: raw.to_owned(),
            field,
        })
        .collect()
}
