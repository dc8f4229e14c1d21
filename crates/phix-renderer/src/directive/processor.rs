//! Directive processor for `CommonMark` directives.
//!
//! Handles preprocessing (before pulldown-cmark) and post-processing (after rendering).

use std::path::PathBuf;

use crate::fence::FenceTracker;
use crate::html::escape_html;

use super::parser::{ParsedDirective, parse_line};
use super::{DirectiveContext, DirectiveHandler, DirectiveOutput, Placement, Replacements};

/// Configuration for the directive processor.
#[derive(Debug, Clone)]
pub struct DirectiveProcessorConfig {
    /// Base directory for resolving relative paths (the document's directory).
    pub base_dir: PathBuf,
    /// Path to the source file being rendered (if known).
    pub source_path: Option<PathBuf>,
}

impl Default for DirectiveProcessorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveProcessorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            source_path: None,
        }
    }

    /// Set the base directory for resolving relative paths.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set the source file path.
    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    fn create_context(&self, line: usize, placement: Placement) -> DirectiveContext<'_> {
        DirectiveContext {
            source_path: self.source_path.as_deref(),
            base_dir: &self.base_dir,
            line,
            placement,
        }
    }
}

/// Runs registered handlers over markdown source, one line at a time.
///
/// Unknown directives and directives inside fenced code are left as written.
///
/// # Example
///
/// ```
/// use phix_renderer::directive::{
///     DirectiveArgs, DirectiveContext, DirectiveHandler, DirectiveOutput, DirectiveProcessor,
/// };
///
/// struct Version;
///
/// impl DirectiveHandler for Version {
///     fn name(&self) -> &str { "version" }
///     fn process(&mut self, args: DirectiveArgs, _ctx: &DirectiveContext) -> DirectiveOutput {
///         DirectiveOutput::html(format!("<em>v{}</em>", args.content))
///     }
/// }
///
/// let mut processor = DirectiveProcessor::new().with_handler(Version);
///
/// let output = processor.process("Requires Dia :version[0.97] or later.");
/// assert_eq!(output, "Requires Dia <em>v0.97</em> or later.");
/// ```
pub struct DirectiveProcessor {
    config: DirectiveProcessorConfig,
    handlers: Vec<Box<dyn DirectiveHandler>>,
    fence: FenceTracker,
    errors: Vec<String>,
}

impl Default for DirectiveProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveProcessor {
    /// Create a new directive processor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DirectiveProcessorConfig::default())
    }

    /// Create a new directive processor with custom configuration.
    #[must_use]
    pub fn with_config(config: DirectiveProcessorConfig) -> Self {
        Self {
            config,
            handlers: Vec::new(),
            fence: FenceTracker::new(),
            errors: Vec::new(),
        }
    }

    /// Register a directive handler.
    #[must_use]
    pub fn with_handler<D: DirectiveHandler + 'static>(mut self, handler: D) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Preprocess markdown, replacing handled directives with their output.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());

        for (idx, line) in input.lines().enumerate() {
            if idx > 0 {
                output.push('\n');
            }
            self.fence.update(line);
            if self.fence.in_fence() {
                output.push_str(line);
            } else {
                self.process_line(line, idx + 1, &mut output);
            }
        }

        if input.ends_with('\n') {
            output.push('\n');
        }

        output
    }

    fn process_line(&mut self, line: &str, line_num: usize, out: &mut String) {
        let indent = &line[..line.len() - line.trim_start().len()];
        let mut remaining = line;

        while let Some((directive, start, end)) = parse_line(remaining) {
            out.push_str(&remaining[..start]);

            let (name, args, placement) = match directive {
                ParsedDirective::Inline { name, args } => (name, args, Placement::Inline),
                ParsedDirective::Leaf { name, args } => (name, args, Placement::Block),
            };

            match self.handlers.iter().position(|h| h.name() == name) {
                Some(idx) => {
                    let ctx = self.config.create_context(line_num, placement);
                    let location = ctx.location();
                    match self.handlers[idx].process(args, &ctx) {
                        DirectiveOutput::Html(html) => push_output(out, &html, placement, indent),
                        DirectiveOutput::Omit => {}
                        DirectiveOutput::Error(message) => {
                            tracing::error!(directive = %name, %location, "{message}");
                            let block = error_block(&name, &message, placement);
                            push_output(out, &block, placement, indent);
                            self.errors.push(format!("{location}: {name}: {message}"));
                        }
                        DirectiveOutput::Skip => out.push_str(&remaining[start..end]),
                    }
                }
                None => out.push_str(&remaining[start..end]),
            }

            remaining = &remaining[end..];
        }

        out.push_str(remaining);
    }

    /// Post-process rendered HTML and the page title taken from it.
    ///
    /// Collects all replacements from handlers and applies them in a single
    /// pass. The title only receives their plain-text forms.
    pub fn post_process(&mut self, html: &mut String, title: Option<&mut String>) {
        let mut replacements = Replacements::with_capacity(self.handlers.len());
        for handler in &mut self.handlers {
            handler.post_process(&mut replacements);
        }
        if let Some(title) = title {
            replacements.apply_text(title);
        }
        replacements.apply(html);
    }

    /// Warnings from all handlers (recovered failures).
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.handlers
            .iter()
            .flat_map(|h| h.warnings().iter().cloned())
            .collect()
    }

    /// Directive configuration errors, prefixed with their location.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Block output is surrounded by blank lines so that it forms its own
/// paragraph even when the directive had no blank line around it. The line's
/// indentation is repeated to stay inside list items.
fn push_output(out: &mut String, output: &str, placement: Placement, indent: &str) {
    match placement {
        Placement::Block => {
            out.push('\n');
            out.push_str(indent);
            out.push_str(output);
            out.push('\n');
            out.push_str(indent);
        }
        Placement::Inline => out.push_str(output),
    }
}

/// Markup shown in place of a malformed directive.
fn error_block(name: &str, message: &str, placement: Placement) -> String {
    let text = format!(
        r#"Error in "{}" directive: {}"#,
        escape_html(name),
        escape_html(message)
    );
    match placement {
        Placement::Block => format!(r#"<div class="phix-error">{text}</div>"#),
        Placement::Inline => format!(r#"<span class="phix-error">{text}</span>"#),
    }
}
