//! Configuration management for the repair guide server.
//!
//! Parses `guide.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `content.project_root`
//! - `content.content_dir`
//! - `content.base_url`

mod expand;

use std::path::{Path, PathBuf};

use guide_content::{
    DEFAULT_FALLBACK_DIR, DEFAULT_LANGUAGE, DEFAULT_LANGUAGES, DocumentId, FallbackRule,
    Languages, default_fallbacks,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override project root directory.
    pub project_root: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "guide.toml";

/// Guide served when the request names none.
const DEFAULT_DOCUMENT: &str = "DQ/DQ_5.json";

/// Catalog document listing all guides.
const CATALOG_DOCUMENT: &str = "repairs.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Language allow-list.
    pub languages: LanguagesConfig,
    /// Image fallback directories.
    pub images: ImagesConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    project_root: Option<String>,
    content_dir: Option<String>,
    default_document: Option<String>,
    catalog_document: Option<String>,
    base_url: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory under which all servable images live.
    pub project_root: PathBuf,
    /// Content directory, relative to the project root unless absolute.
    pub content_subdir: PathBuf,
    /// Document served when the request names none.
    pub default_document: String,
    /// Catalog document, relative to the content directory.
    pub catalog_document: String,
    /// Web path prefix the project root is served under (no trailing slash).
    pub base_url: String,
}

impl ContentConfig {
    /// Content root directory.
    #[must_use]
    pub fn content_dir(&self) -> PathBuf {
        self.project_root.join(&self.content_subdir)
    }
}

/// Language allow-list configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LanguagesConfig {
    /// Allowed language codes, in display order.
    pub allowed: Vec<String>,
    /// Code used for unknown requests and as the text fallback.
    pub default: String,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_LANGUAGES.iter().map(|&c| c.to_owned()).collect(),
            default: DEFAULT_LANGUAGE.to_owned(),
        }
    }
}

impl LanguagesConfig {
    /// Build the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the default is not in the list.
    pub fn to_languages(&self) -> Result<Languages, ConfigError> {
        Languages::new(self.allowed.clone(), self.default.clone()).ok_or_else(|| {
            ConfigError::Validation(format!(
                "languages.default \"{}\" must be one of languages.allowed",
                self.default
            ))
        })
    }
}

/// One image fallback rule.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FallbackConfig {
    /// Document file name prefix (case-insensitive).
    pub prefix: String,
    /// Directory relative to the project root.
    pub dir: String,
}

/// Image fallback configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Prefix rules, tried in order; the first match wins.
    pub fallbacks: Vec<FallbackConfig>,
    /// Directory used when no rule matches.
    pub default_fallback: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            fallbacks: default_fallbacks()
                .into_iter()
                .map(|rule| FallbackConfig {
                    prefix: rule.prefix,
                    dir: rule.dir.to_string_lossy().into_owned(),
                })
                .collect(),
            default_fallback: DEFAULT_FALLBACK_DIR.to_owned(),
        }
    }
}

impl ImagesConfig {
    /// Fallback rules for the image resolver.
    #[must_use]
    pub fn rules(&self) -> Vec<FallbackRule> {
        self.fallbacks
            .iter()
            .map(|f| FallbackRule::new(f.prefix.clone(), &f.dir))
            .collect()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.project_root`").
        field: String,
        /// Error message (e.g., "${`SUPPORT_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a document identifier field to pass identifier validation.
fn require_document_id(value: &str, field: &str) -> Result<(), ConfigError> {
    DocumentId::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(format!("{field}: {e}")))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `guide.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(project_root) = &settings.project_root {
            self.content_resolved.project_root.clone_from(project_root);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            languages: LanguagesConfig::default(),
            images: ImagesConfig::default(),
            content_resolved: ContentConfig {
                project_root: base.to_path_buf(),
                content_subdir: PathBuf::from("data"),
                default_document: DEFAULT_DOCUMENT.to_owned(),
                catalog_document: CATALOG_DOCUMENT.to_owned(),
                base_url: String::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_content()?;
        self.validate_languages()?;
        self.validate_images()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate content configuration.
    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;
        require_document_id(&content.default_document, "content.default_document")?;
        require_document_id(&content.catalog_document, "content.catalog_document")?;

        if !content.base_url.is_empty() && !content.base_url.starts_with('/') {
            return Err(ConfigError::Validation(
                "content.base_url must be empty or start with /".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate language configuration.
    fn validate_languages(&self) -> Result<(), ConfigError> {
        if self.languages.allowed.is_empty() {
            return Err(ConfigError::Validation(
                "languages.allowed cannot be empty".to_owned(),
            ));
        }
        for code in &self.languages.allowed {
            require_non_empty(code, "languages.allowed entry")?;
        }
        self.languages.to_languages()?;
        Ok(())
    }

    /// Validate image fallback configuration.
    fn validate_images(&self) -> Result<(), ConfigError> {
        for fallback in &self.images.fallbacks {
            require_non_empty(&fallback.prefix, "images.fallbacks.prefix")?;
            require_non_empty(&fallback.dir, "images.fallbacks.dir")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        let content = &mut self.content;
        if let Some(ref root) = content.project_root {
            content.project_root = Some(expand::expand_env(root, "content.project_root")?);
        }
        if let Some(ref dir) = content.content_dir {
            content.content_dir = Some(expand::expand_env(dir, "content.content_dir")?);
        }
        if let Some(ref url) = content.base_url {
            content.base_url = Some(expand::expand_env(url, "content.base_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.content;

        self.content_resolved = ContentConfig {
            project_root: config_dir.join(raw.project_root.as_deref().unwrap_or(".")),
            content_subdir: PathBuf::from(raw.content_dir.as_deref().unwrap_or("data")),
            default_document: raw
                .default_document
                .clone()
                .unwrap_or_else(|| DEFAULT_DOCUMENT.to_owned()),
            catalog_document: raw
                .catalog_document
                .clone()
                .unwrap_or_else(|| CATALOG_DOCUMENT.to_owned()),
            base_url: raw
                .base_url
                .as_deref()
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_owned(),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn load_toml(toml: &str) -> Result<(tempfile::TempDir, Config), ConfigError> {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, toml).unwrap();
        let config = Config::load(Some(&path), None)?;
        Ok((temp, config))
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.content_resolved.project_root, PathBuf::from("/test"));
        assert_eq!(
            config.content_resolved.content_dir(),
            PathBuf::from("/test/data")
        );
        assert_eq!(config.content_resolved.default_document, "DQ/DQ_5.json");
        assert_eq!(config.content_resolved.catalog_document, "repairs.json");
        assert_eq!(config.content_resolved.base_url, "");
        assert_eq!(config.languages.allowed, ["pt", "en", "es", "fr"]);
        assert_eq!(config.languages.default, "pt");
        assert_eq!(config.images.default_fallback, "repairs");
        assert_eq!(config.images.rules(), default_fallbacks());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.languages.default, "pt");
    }

    #[test]
    fn test_load_full_config() {
        let (temp, config) = load_toml(
            r#"
[server]
host = "0.0.0.0"
port = 9000

[content]
project_root = "site"
content_dir = "json"
default_document = "DR/DR_1.json"
catalog_document = "index.json"
base_url = "/support/"

[languages]
allowed = ["en", "de"]
default = "en"

[images]
default_fallback = "media"

[[images.fallbacks]]
prefix = "AB_"
dir = "media/ab"
"#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.content_resolved.project_root, temp.path().join("site"));
        assert_eq!(
            config.content_resolved.content_dir(),
            temp.path().join("site").join("json")
        );
        assert_eq!(config.content_resolved.default_document, "DR/DR_1.json");
        assert_eq!(config.content_resolved.catalog_document, "index.json");
        assert_eq!(config.content_resolved.base_url, "/support");
        assert_eq!(config.languages.to_languages().unwrap().select(None).code(), "en");
        assert_eq!(config.images.rules(), vec![FallbackRule::new("AB_", "media/ab")]);
        assert_eq!(config.images.default_fallback, "media");
        assert_eq!(
            config.config_path.as_deref(),
            Some(temp.path().join(CONFIG_FILENAME).as_path())
        );
    }

    #[test]
    fn test_cli_settings_override() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(8080),
            project_root: Some(PathBuf::from("/srv/site")),
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.content_resolved.content_dir(),
            PathBuf::from("/srv/site/data")
        );
    }

    #[test]
    fn test_explicit_missing_config() {
        let err = Config::load(Some(Path::new("/nonexistent/guide.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = load_toml("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_port_zero_rejected() {
        let err = load_toml("[server]\nport = 0\n").unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_empty_host_rejected() {
        let err = load_toml("[server]\nhost = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_default_language_must_be_allowed() {
        let err = load_toml("[languages]\nallowed = [\"en\"]\ndefault = \"pt\"\n").unwrap_err();
        assert!(err.to_string().contains("languages.default"));
    }

    #[test]
    fn test_empty_language_list_rejected() {
        let err = load_toml("[languages]\nallowed = []\n").unwrap_err();
        assert!(err.to_string().contains("languages.allowed"));
    }

    #[test]
    fn test_default_document_validated() {
        let err = load_toml("[content]\ndefault_document = \"../etc/passwd.json\"\n").unwrap_err();
        assert!(err.to_string().contains("content.default_document"));

        let err = load_toml("[content]\ndefault_document = \"guide.php\"\n").unwrap_err();
        assert!(err.to_string().contains("content.default_document"));
    }

    #[test]
    fn test_base_url_must_be_absolute() {
        let err = load_toml("[content]\nbase_url = \"support\"\n").unwrap_err();
        assert!(err.to_string().contains("content.base_url"));
    }

    #[test]
    fn test_empty_fallback_prefix_rejected() {
        let err = load_toml("[[images.fallbacks]]\nprefix = \"\"\ndir = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("images.fallbacks.prefix"));
    }

    #[test]
    fn test_env_expansion_in_project_root() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("GUIDE_TEST_SITE_DIR", "public");
        }
        let (temp, config) =
            load_toml("[content]\nproject_root = \"${GUIDE_TEST_SITE_DIR}\"\n").unwrap();
        assert_eq!(config.content_resolved.project_root, temp.path().join("public"));
        unsafe {
            std::env::remove_var("GUIDE_TEST_SITE_DIR");
        }
    }

    #[test]
    fn test_env_expansion_missing_var() {
        let err = load_toml("[server]\nhost = \"${GUIDE_TEST_NEVER_SET}\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }
}
