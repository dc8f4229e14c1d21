//! Directive output types.
//!
//! Defines the output variants that directive handlers can return.

/// Output from directive processing.
///
/// - [`Html`](Self::Html): terminal markup that replaces the directive and
///   passes through pulldown-cmark unchanged
/// - [`Omit`](Self::Omit): the directive produced nothing; it is removed
/// - [`Error`](Self::Error): the directive was malformed; an error block
///   replaces it and the message is recorded as a document error
/// - [`Skip`](Self::Skip): not handled, pass the directive through unchanged
///
/// # Example
///
/// ```
/// use phix_renderer::directive::DirectiveOutput;
///
/// let output = DirectiveOutput::html(r#"<object data="_images/flow.svg"></object>"#);
/// assert!(matches!(output, DirectiveOutput::Html(_)));
///
/// let output = DirectiveOutput::error("\"align\" must be one of: left, center, right");
/// assert!(matches!(output, DirectiveOutput::Error(_)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveOutput {
    /// HTML that passes through pulldown-cmark unchanged.
    Html(String),
    /// Nothing is emitted for this directive.
    Omit,
    /// Configuration error message for this directive.
    Error(String),
    /// Don't handle this directive (pass through unchanged).
    Skip,
}

impl DirectiveOutput {
    /// Create an HTML output.
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }

    /// Create an error output.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html() {
        let output = DirectiveOutput::html("<p>test</p>");
        assert_eq!(output, DirectiveOutput::Html("<p>test</p>".to_owned()));
    }

    #[test]
    fn test_error_from_string() {
        let output = DirectiveOutput::error(String::from("bad option"));
        assert_eq!(output, DirectiveOutput::Error("bad option".to_owned()));
    }
}
