//! `CommonMark` directive syntax for diagram plug-ins.
//!
//! Two phases:
//!
//! 1. **Preprocessing** ([`DirectiveProcessor::process`]): directive syntax is
//!    replaced with markup (or placeholders) that pass through pulldown-cmark
//!    unchanged.
//!
//! 2. **Post-processing** ([`DirectiveProcessor::post_process`]): handlers
//!    register final markup in a [`Replacements`] collector which is applied
//!    to the rendered HTML in one pass.
//!
//! Inline (`:name[content]{attrs}`) and leaf (`::name[content]{attrs}`)
//! forms share a single [`DirectiveHandler`]; the [`Placement`] in the
//! context tells them apart.

mod args;
mod context;
mod handler;
mod output;
mod parser;
mod processor;
mod replacements;

pub use args::DirectiveArgs;
pub use context::{DirectiveContext, Placement};
pub use handler::DirectiveHandler;
pub use output::DirectiveOutput;
pub use processor::{DirectiveProcessor, DirectiveProcessorConfig};
pub use replacements::Replacements;
