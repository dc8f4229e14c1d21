//! Site builder: every markdown page under the source directory becomes an
//! HTML page under the output directory, with its diagrams rendered.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use phix_config::{BuildConfig, Config, OutputFormat};
use phix_diagrams::{
    DiagramDirective, OutputLayout, Pipeline, PipelineConfig, RenderEnvironment, RequestDefaults,
    SequenceStyle, SystemRenderer, create_agent, image_path_for_page,
};
use phix_renderer::MarkdownRenderer;
use phix_renderer::directive::{DirectiveProcessor, DirectiveProcessorConfig};

use crate::error::CliError;
use crate::template::PageTemplate;

/// Build the diagram pipeline described by `config`.
pub(crate) fn pipeline_for(config: &Config, env: RenderEnvironment) -> Result<Pipeline, CliError> {
    let style = config
        .diagrams
        .default_style
        .parse::<SequenceStyle>()
        .map_err(|e| CliError::Validation(format!("diagrams.default_style: {e}")))?;
    let defaults = RequestDefaults {
        style,
        api_version: config.diagrams.api_version.clone(),
    };

    let layout = OutputLayout::new(
        config.build.output_dir.clone(),
        config.build.image_dir.clone(),
    );
    let agent = create_agent(config.diagrams.timeout_secs.map(Duration::from_secs));
    let renderer = SystemRenderer::new(agent)
        .with_default_server_url(config.diagrams.sequence_server_url.clone());

    Ok(Pipeline::new(
        PipelineConfig::new(layout).with_defaults(defaults),
        env,
        renderer,
    ))
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub(crate) struct BuildReport {
    pub(crate) pages: usize,
    /// Diagrams that could not be rendered.
    pub(crate) warnings: Vec<String>,
    /// Misconfigured directives.
    pub(crate) errors: Vec<String>,
}

pub(crate) struct SiteBuilder {
    build: BuildConfig,
    pipeline: Arc<Pipeline>,
    template: PageTemplate,
}

impl SiteBuilder {
    pub(crate) fn new(build: BuildConfig, pipeline: Pipeline) -> Result<Self, CliError> {
        Ok(Self {
            build,
            pipeline: Arc::new(pipeline),
            template: PageTemplate::new()?,
        })
    }

    /// Render every page. Diagram problems end up in the report; only
    /// unreadable or unwritable pages abort the build.
    pub(crate) fn build(&self) -> Result<BuildReport, CliError> {
        let source_dir = &self.build.source_dir;
        if !source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "source directory {} does not exist",
                source_dir.display()
            )));
        }

        fs::create_dir_all(&self.build.output_dir)?;

        let mut report = BuildReport::default();
        for page in scan_pages(source_dir) {
            self.build_page(&page, &mut report)?;
            report.pages += 1;
        }
        Ok(report)
    }

    fn build_page(&self, relative: &Path, report: &mut BuildReport) -> Result<(), CliError> {
        let source = self.build.source_dir.join(relative);
        let markdown = fs::read_to_string(&source).map_err(|e| CliError::Page {
            path: source.clone(),
            source: e,
        })?;

        let html_path = relative.with_extension("html");
        let image_path = match self.build.format {
            OutputFormat::Html => Some(image_path_for_page(
                &url_path(&html_path),
                &self.build.image_dir,
            )),
            OutputFormat::Print => None,
        };

        let base_dir = source.parent().unwrap_or(self.build.source_dir.as_path());
        let config = DirectiveProcessorConfig::new()
            .with_base_dir(base_dir)
            .with_source_path(source.clone());
        let processor = DiagramDirective::all(&self.pipeline, image_path.as_deref())
            .into_iter()
            .fold(DirectiveProcessor::with_config(config), |p, d| {
                p.with_handler(d)
            });

        let result = MarkdownRenderer::new(processor).render(&markdown);
        let title = result.title.unwrap_or_else(|| {
            relative
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let page = self.template.render(&title, &result.html)?;

        let destination = self.build.output_dir.join(&html_path);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, page).map_err(|e| CliError::Page {
            path: destination.clone(),
            source: e,
        })?;
        tracing::info!(page = %html_path.display(), "Built page");

        report.warnings.extend(result.warnings);
        report.errors.extend(result.errors);
        Ok(())
    }
}

/// Markdown files under `source_dir`, relative to it and sorted.
///
/// Hidden files and directories are skipped.
fn scan_pages(source_dir: &Path) -> Vec<PathBuf> {
    let mut pages = Vec::new();
    scan_directory(source_dir, Path::new(""), &mut pages);
    pages.sort();
    pages
}

fn scan_directory(dir: &Path, prefix: &Path, pages: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let relative = prefix.join(&name);
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            scan_directory(&path, &relative, pages);
        } else if path.extension().is_some_and(|e| e == "md") {
            pages.push(relative);
        }
    }
}

/// `/`-separated form of a relative path.
fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
