//! Diagram directives for Phix.
//!
//! Renders diagrams drawn in ArgoUML, Dia, Inkscape or a web sequence diagram
//! service to SVG at build time and embeds them in the page:
//!
//! - [`command`]: launch commands for local tools, with `<TOOL>_LAUNCH` overrides
//! - [`planner`]: output paths and the file-existence cache
//! - [`render`]: the backends behind the [`DiagramRenderer`] trait
//! - [`postprocess`]: optional SVG filter commands
//! - [`pipeline`]: plan, render, filter, embed; failures become warnings
//! - [`DiagramDirective`]: the directive handlers registered with the page renderer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use phix_diagrams::{
//!     DiagramDirective, OutputLayout, Pipeline, PipelineConfig, RenderEnvironment,
//!     SystemRenderer, create_agent,
//! };
//! use phix_renderer::MarkdownRenderer;
//! use phix_renderer::directive::DirectiveProcessor;
//!
//! let pipeline = Arc::new(Pipeline::new(
//!     PipelineConfig::new(OutputLayout::new("site", "_images")),
//!     RenderEnvironment::capture(),
//!     SystemRenderer::new(create_agent(None)),
//! ));
//!
//! let processor = DiagramDirective::all(&pipeline, Some("_images"))
//!     .into_iter()
//!     .fold(DirectiveProcessor::new(), |p, d| p.with_handler(d));
//!
//! let result = MarkdownRenderer::new(processor).render("::dia[flow.dia]{width=80%}\n");
//! ```

mod backend;
pub mod command;
mod consts;
mod directive;
mod environment;
mod error;
mod html;
mod options;
pub mod pipeline;
pub mod planner;
pub mod postprocess;
mod reference;
pub mod render;

pub use backend::Backend;
pub use command::{Command, resolve_command};
pub use consts::SEQUENCE_SERVER_ENV;
pub use directive::{DiagramDirective, image_path_for_page};
pub use environment::{Platform, RenderEnvironment};
pub use error::{OptionError, RenderError};
pub use html::embed_html;
pub use options::{Align, EmbedOptions, RenderRequest, RequestDefaults, parse_request};
pub use pipeline::{Pipeline, PipelineConfig, RenderOutcome};
pub use planner::{OutputLayout, PlannedOutput, plan_output};
pub use reference::{DiagramReference, SequenceStyle, UnknownStyle};
pub use render::sequence::create_agent;
pub use render::{DiagramRenderer, SystemRenderer};
