//! `guide serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use guide_config::{CliSettings, Config};
use guide_server::{run_server, server_config_from_guide_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover guide.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root directory (overrides config).
    #[arg(long, env = "GUIDE_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (INFO-level logging).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            project_root: self.project_root,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let content = &config.content_resolved;

        // Print startup info
        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Project root: {}",
            content.project_root.display()
        ));
        output.info(&format!(
            "Content directory: {}",
            content.content_dir().display()
        ));
        output.info(&format!(
            "Languages: {} (default: {})",
            config.languages.allowed.join(", "),
            config.languages.default
        ));
        if !content.content_dir().is_dir() {
            output.warning("Content directory does not exist; guide requests will fail");
        }

        // Build server config and run
        let server_config = server_config_from_guide_config(&config, version.to_owned())?;
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
