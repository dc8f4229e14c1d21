//! The `argouml`, `dia`, `inkscape` and `websequencediagram` directives.

use std::sync::Arc;

use phix_renderer::directive::{
    DirectiveArgs, DirectiveContext, DirectiveHandler, DirectiveOutput, Placement, Replacements,
};
use phix_renderer::relative_path;

use crate::backend::Backend;
use crate::consts::PLACEHOLDER_PREFIX;
use crate::options::parse_request;
use crate::pipeline::{Pipeline, RenderOutcome};

/// Directive handler for one diagram backend.
///
/// Rendering happens while the markdown is preprocessed; the directive is
/// replaced by a placeholder that survives pulldown-cmark and is swapped for
/// the embed markup afterwards. A block directive's placeholder ends up alone
/// in a paragraph, which the markup replaces entirely.
pub struct DiagramDirective {
    backend: Backend,
    pipeline: Arc<Pipeline>,
    image_path: Option<String>,
    embeds: Vec<Embed>,
    warnings: Vec<String>,
}

struct Embed {
    placeholder: String,
    html: String,
    alt: String,
    placement: Placement,
}

impl DiagramDirective {
    /// Create a directive for `backend` rendering through `pipeline`.
    ///
    /// Without an image path, diagrams are planned for print output.
    #[must_use]
    pub fn new(backend: Backend, pipeline: Arc<Pipeline>) -> Self {
        Self {
            backend,
            pipeline,
            image_path: None,
            embeds: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Set the image directory relative to the current page (HTML output).
    #[must_use]
    pub fn with_image_path(mut self, image_path: Option<String>) -> Self {
        self.image_path = image_path;
        self
    }

    /// One directive per backend, sharing a pipeline.
    #[must_use]
    pub fn all(pipeline: &Arc<Pipeline>, image_path: Option<&str>) -> Vec<Self> {
        Backend::ALL
            .into_iter()
            .map(|backend| {
                Self::new(backend, Arc::clone(pipeline))
                    .with_image_path(image_path.map(str::to_owned))
            })
            .collect()
    }
}

impl DirectiveHandler for DiagramDirective {
    fn name(&self) -> &str {
        self.backend.directive_name()
    }

    fn process(&mut self, args: DirectiveArgs, ctx: &DirectiveContext) -> DirectiveOutput {
        let request = match parse_request(self.backend, &args, ctx, &self.pipeline.config().defaults)
        {
            Ok(request) => request,
            Err(e) => return DirectiveOutput::error(e.to_string()),
        };

        match self
            .pipeline
            .render_and_embed(&request, self.image_path.as_deref(), ctx.placement)
        {
            RenderOutcome::Embedded { html } => {
                let placeholder = format!(
                    "{PLACEHOLDER_PREFIX}{}_{}}}}}",
                    self.backend.directive_name().to_ascii_uppercase(),
                    self.embeds.len()
                );
                self.embeds.push(Embed {
                    placeholder: placeholder.clone(),
                    html,
                    alt: request.embed.alt.clone().unwrap_or_default(),
                    placement: ctx.placement,
                });
                DirectiveOutput::html(placeholder)
            }
            RenderOutcome::Failed { source, reason } => {
                self.warnings.push(format!(
                    "{}: could not render {} because {reason}",
                    ctx.location(),
                    source.display()
                ));
                DirectiveOutput::Omit
            }
        }
    }

    fn post_process(&mut self, replacements: &mut Replacements) {
        for embed in self.embeds.drain(..) {
            if embed.placement == Placement::Block {
                replacements.add(format!("<p>{}</p>\n", embed.placeholder), embed.html.clone());
            }
            replacements.add_text(embed.placeholder.clone(), embed.alt);
            replacements.add(embed.placeholder, embed.html);
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Image directory as referenced from a page, both relative to the output root.
///
/// ```
/// use phix_diagrams::image_path_for_page;
///
/// assert_eq!(image_path_for_page("index.html", "_images"), "_images");
/// assert_eq!(image_path_for_page("guide/setup.html", "_images"), "../_images");
/// ```
#[must_use]
pub fn image_path_for_page(page: &str, image_dir: &str) -> String {
    relative_path(page, image_dir)
}
