//! `guidebook build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use guidebook_config::{CliSettings, Config};
use guidebook_server::{SiteChrome, StaticSiteBuilder, TracingClient, load_site};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args, Debug)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover guidebook.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pages directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (show markup warnings).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or content fails to load, or the
    /// output can't be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let docs = &config.docs_resolved;

        output.field("Pages", docs.source_dir.display());
        output.field("Output", docs.output_dir.display());

        let site = Arc::new(load_site(&docs.source_dir)?);
        let builder = StaticSiteBuilder::new(site, SiteChrome::from_config(&config))
            .with_public_dir(docs.public_dir.clone())
            .with_analytics(
                Arc::new(TracingClient::new()),
                config.analytics.tracking_id.clone(),
            );
        let report = builder.build(&docs.output_dir)?;

        for slug in &report.not_found {
            output.warning(&format!("No page for /{slug}, wrote not-found view"));
        }
        output.success(&format!(
            "Built {} pages ({} public files) to {}",
            report.pages_written,
            report.public_files,
            docs.output_dir.display()
        ));
        Ok(())
    }
}
