//! Markdown page renderer with pluggable `CommonMark` directives.
//!
//! Directive handlers replace `:name[...]{...}` and `::name[...]{...}` syntax
//! before pulldown-cmark runs and may patch the rendered HTML afterwards.
//!
//! # Example
//!
//! ```
//! use phix_renderer::MarkdownRenderer;
//! use phix_renderer::directive::DirectiveProcessor;
//!
//! let result = MarkdownRenderer::new(DirectiveProcessor::new()).render("# Hello\n\n**Bold** text");
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert!(result.html.contains("<strong>Bold</strong>"));
//! ```

pub mod directive;
mod fence;
mod html;
mod renderer;
mod util;

pub use html::escape_html;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use util::relative_path;
