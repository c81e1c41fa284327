//! `guidebook serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use guidebook_config::{CliSettings, Config};
use guidebook_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover guidebook.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pages directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "GUIDEBOOK_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "GUIDEBOOK_PORT")]
    port: Option<u16>,

    /// Enable verbose output (show markup warnings and page views).
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

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.highlight(&format!(
            "Guidebook running at http://{}:{}",
            config.server.host, config.server.port
        ));
        output.field("Pages", config.docs_resolved.source_dir.display());
        output.field("Public", config.docs_resolved.public_dir.display());
        match &config.analytics.tracking_id {
            Some(id) => output.field("Analytics", id),
            None => output.field("Analytics", "disabled"),
        }

        let server_config = server_config_from_config(&config, version.to_owned(), self.verbose);
        run_server(server_config).await?;

        output.info("Server stopped");
        Ok(())
    }
}
