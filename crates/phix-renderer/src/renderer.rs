//! Markdown page rendering with directive support.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::directive::DirectiveProcessor;

/// Result of rendering one page.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first H1 heading, if any.
    pub title: Option<String>,
    /// Recovered failures reported by directive handlers.
    pub warnings: Vec<String>,
    /// Directive configuration errors.
    pub errors: Vec<String>,
}

/// Renders markdown to HTML, running directives before and after pulldown-cmark.
pub struct MarkdownRenderer {
    processor: DirectiveProcessor,
    gfm: bool,
}

impl MarkdownRenderer {
    /// Create a renderer around a configured directive processor.
    #[must_use]
    pub fn new(processor: DirectiveProcessor) -> Self {
        Self {
            processor,
            gfm: true,
        }
    }

    /// Enable or disable GitHub-flavored extensions (tables, strikethrough, task lists).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Render a markdown document.
    #[must_use]
    pub fn render(mut self, markdown: &str) -> RenderResult {
        let preprocessed = self.processor.process(markdown);

        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }

        let events: Vec<Event<'_>> = Parser::new_ext(&preprocessed, options).collect();
        let mut title = extract_title(&events);

        let mut output = String::with_capacity(preprocessed.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        self.processor.post_process(&mut output, title.as_mut());
        let title = title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());

        RenderResult {
            html: output,
            title,
            warnings: self.processor.warnings(),
            errors: self.processor.errors().to_vec(),
        }
    }
}

/// Plain text of the first H1 heading.
fn extract_title(events: &[Event<'_>]) -> Option<String> {
    let start = events.iter().position(|e| {
        matches!(
            e,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            })
        )
    })?;

    let mut title = String::new();
    for event in &events[start + 1..] {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(text) | Event::Code(text) => title.push_str(text),
            Event::SoftBreak | Event::HardBreak => title.push(' '),
            _ => {}
        }
    }

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_owned())
}
