//! `phix build` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use phix_config::{CliSettings, Config, OutputFormat};
use phix_diagrams::RenderEnvironment;

use crate::builder::{SiteBuilder, pipeline_for};
use crate::error::CliError;
use crate::output::Output;

/// Output format accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Print,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => Self::Html,
            FormatArg::Print => Self::Print,
        }
    }
}

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover phix.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for pages and diagrams (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Web sequence diagram server URL (overrides config).
    #[arg(long)]
    server_url: Option<String>,

    /// Exit with an error when a directive is misconfigured.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output (info-level logging).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            format: self.format.map(OutputFormat::from),
            sequence_server_url: self.server_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!("Source: {}", config.build.source_dir.display()));
        output.info(&format!("Output: {}", config.build.output_dir.display()));

        let pipeline = pipeline_for(&config, RenderEnvironment::capture())?;
        let report = SiteBuilder::new(config.build.clone(), pipeline)?.build()?;

        for warning in &report.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        for error in &report.errors {
            output.error(&format!("Error: {error}"));
        }

        if self.strict && !report.errors.is_empty() {
            return Err(CliError::Validation(format!(
                "{} directive error(s) in strict mode",
                report.errors.len()
            )));
        }

        output.success(&format!(
            "Built {} page(s) to {}",
            report.pages,
            config.build.output_dir.display()
        ));
        Ok(())
    }
}
