//! The render pipeline: plan, render, post-process, embed.
//!
//! Each diagram either ends embedded or failed. Failures never abort the
//! build; they come back as [`RenderOutcome::Failed`] for the caller to
//! report.

use std::path::{Path, PathBuf};

use phix_renderer::directive::Placement;

use crate::environment::RenderEnvironment;
use crate::error::RenderError;
use crate::html::embed_html;
use crate::options::{RenderRequest, RequestDefaults};
use crate::planner::{OutputLayout, PlannedOutput, plan_output};
use crate::postprocess;
use crate::render::DiagramRenderer;

/// Build-wide pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Where rendered diagrams go.
    pub layout: OutputLayout,
    /// Defaults for options a directive leaves out.
    pub defaults: RequestDefaults,
}

impl PipelineConfig {
    #[must_use]
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            defaults: RequestDefaults::default(),
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Result of rendering one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Markup embedding the SVG.
    Embedded { html: String },
    /// The diagram could not be produced.
    Failed { source: PathBuf, reason: String },
}

/// Sequences planning, rendering, post-processing and embedding.
pub struct Pipeline {
    config: PipelineConfig,
    env: RenderEnvironment,
    renderer: Box<dyn DiagramRenderer>,
}

impl Pipeline {
    /// Create a pipeline. `env` is the snapshot every render sees.
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        env: RenderEnvironment,
        renderer: impl DiagramRenderer + 'static,
    ) -> Self {
        Self {
            config,
            env,
            renderer: Box::new(renderer),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Render one diagram and produce its embed markup.
    ///
    /// `image_path` is the image directory relative to the page for HTML
    /// output, `None` for print output. An existing output file is reused
    /// without running anything.
    pub fn render_and_embed(
        &self,
        request: &RenderRequest,
        image_path: Option<&str>,
        placement: Placement,
    ) -> RenderOutcome {
        let source = request.reference.source();

        match self.produce(request, image_path) {
            Ok(planned) => RenderOutcome::Embedded {
                html: embed_html(
                    request.reference.backend(),
                    &planned.reference_path,
                    &request.embed,
                    placement,
                ),
            },
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "Could not render diagram");
                RenderOutcome::Failed {
                    source: source.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn produce(
        &self,
        request: &RenderRequest,
        image_path: Option<&str>,
    ) -> Result<PlannedOutput, RenderError> {
        let reference = &request.reference;
        let planned = plan_output(
            reference.source(),
            reference.diagram_name(),
            &self.config.layout,
            image_path,
        )?;
        tracing::debug!(
            reference = %planned.reference_path,
            render = %planned.render_path.display(),
            cached = planned.cached,
            "Planned diagram output"
        );

        if planned.cached {
            return Ok(planned);
        }

        if let Err(e) = self.render_to(request, &planned.render_path) {
            discard_partial(&planned.render_path);
            return Err(e);
        }

        tracing::info!(
            backend = %reference.backend(),
            source = %reference.source().display(),
            output = %planned.render_path.display(),
            "Rendered diagram"
        );
        Ok(planned)
    }

    fn render_to(&self, request: &RenderRequest, destination: &Path) -> Result<(), RenderError> {
        let Some(template) = &request.postprocess else {
            return self.renderer.render(&request.reference, destination, &self.env);
        };

        // Parse first: an unset variable must fail before any tool runs
        let filter = postprocess::parse_command(template, &self.env)?;

        let scratch = tempfile::Builder::new().prefix("phix-").tempdir()?;
        let intermediate = scratch.path().join("intermediate.svg");
        self.renderer
            .render(&request.reference, &intermediate, &self.env)?;
        postprocess::run(&filter, &intermediate, destination)?;

        if let Err(e) = scratch.close() {
            tracing::debug!(error = %e, "Could not remove intermediate SVG");
        }
        Ok(())
    }
}

/// Remove a partially written output so it never becomes a cache hit.
fn discard_partial(path: &Path) {
    if path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "Could not remove partial output");
    }
}
