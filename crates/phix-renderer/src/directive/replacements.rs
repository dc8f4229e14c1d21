//! Deferred string replacement for post-processing.
//!
//! Handlers emit placeholders while markdown is preprocessed and register the
//! final markup here; the processor applies everything once over the rendered
//! HTML.

/// Collects `(placeholder, markup)` pairs for a single application pass.
///
/// Pairs are applied in registration order, so a handler can register a more
/// specific pattern (a placeholder wrapped in `<p>`) before the bare one.
///
/// # Example
///
/// ```
/// use phix_renderer::directive::Replacements;
///
/// let mut html = "<p>{{PHIX_DIAGRAM_0}}</p>".to_owned();
/// let mut replacements = Replacements::new();
/// replacements.add("<p>{{PHIX_DIAGRAM_0}}</p>", "<p class=\"dia\">...</p>");
/// replacements.add("{{PHIX_DIAGRAM_0}}", "<span class=\"dia\">...</span>");
/// replacements.apply(&mut html);
///
/// assert_eq!(html, "<p class=\"dia\">...</p>");
/// ```
#[derive(Debug, Default)]
pub struct Replacements {
    items: Vec<(String, String)>,
    text: Vec<(String, String)>,
}

impl Replacements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            text: Vec::new(),
        }
    }

    /// Register a replacement of every occurrence of `from` with `to`.
    pub fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.items.push((from.into(), to.into()));
    }

    /// Register the plain-text form of `from`, used where markup cannot
    /// appear (the page title).
    pub fn add_text(&mut self, from: impl Into<String>, text: impl Into<String>) {
        self.text.push((from.into(), text.into()));
    }

    /// Apply the plain-text replacements to `text`.
    pub fn apply_text(&self, text: &mut String) {
        for (from, to) in &self.text {
            if text.contains(from.as_str()) {
                *text = text.replace(from.as_str(), to);
            }
        }
    }

    /// Apply all registered replacements, consuming the collector.
    pub fn apply(self, html: &mut String) {
        for (from, to) in self.items {
            if html.contains(&from) {
                *html = html.replace(&from, &to);
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_registered() {
        let mut html = "<p>unchanged</p>".to_owned();
        Replacements::new().apply(&mut html);
        assert_eq!(html, "<p>unchanged</p>");
    }

    #[test]
    fn test_block_and_inline_occurrences() {
        let mut html = "<p>{{X}}</p>\n<p>text {{X}} text</p>".to_owned();
        let mut replacements = Replacements::with_capacity(2);
        replacements.add("<p>{{X}}</p>", "<div>block</div>");
        replacements.add("{{X}}", "<span>inline</span>");
        assert_eq!(replacements.len(), 2);
        replacements.apply(&mut html);
        assert_eq!(html, "<div>block</div>\n<p>text <span>inline</span> text</p>");
    }

    #[test]
    fn test_missing_placeholder_is_ignored() {
        let mut html = "<p>no placeholders</p>".to_owned();
        let mut replacements = Replacements::new();
        replacements.add("{{Y}}", "<b>y</b>");
        assert!(!replacements.is_empty());
        replacements.apply(&mut html);
        assert_eq!(html, "<p>no placeholders</p>");
    }

    #[test]
    fn test_text_form_kept_apart_from_markup() {
        let mut replacements = Replacements::new();
        replacements.add("{{X}}", "<span>inline</span>");
        replacements.add_text("{{X}}", "Logo");

        let mut title = "Overview {{X}}".to_owned();
        replacements.apply_text(&mut title);
        assert_eq!(title, "Overview Logo");

        let mut html = "<h1>Overview {{X}}</h1>".to_owned();
        replacements.apply(&mut html);
        assert_eq!(html, "<h1>Overview <span>inline</span></h1>");
    }
}
