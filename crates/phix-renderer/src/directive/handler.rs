//! Directive handler trait.
//!
//! Handlers serve both inline (`:name[...]{...}`) and leaf (`::name[...]{...}`)
//! syntax; [`DirectiveContext::placement`] tells them which one they got.

use super::{DirectiveArgs, DirectiveContext, DirectiveOutput, Replacements};

/// Handler for a named directive.
///
/// # Two-Phase Processing
///
/// Handlers may return intermediate markup from [`process`](Self::process)
/// and register final replacements in [`post_process`](Self::post_process),
/// which runs once over the rendered HTML.
///
/// # Thread Safety
///
/// Handlers implement `Send` only (not `Sync`) since each document gets its own
/// processor instance.
///
/// # Example
///
/// ```
/// use phix_renderer::directive::{
///     DirectiveArgs, DirectiveContext, DirectiveHandler, DirectiveOutput,
/// };
///
/// struct Abbr;
///
/// impl DirectiveHandler for Abbr {
///     fn name(&self) -> &str { "abbr" }
///
///     fn process(&mut self, args: DirectiveArgs, _ctx: &DirectiveContext) -> DirectiveOutput {
///         match args.get("title") {
///             Some(title) => DirectiveOutput::html(format!(
///                 r#"<abbr title="{title}">{}</abbr>"#,
///                 args.content
///             )),
///             None => DirectiveOutput::error("the \"title\" option is required"),
///         }
///     }
/// }
/// ```
pub trait DirectiveHandler: Send {
    /// Directive name matched against `:name` and `::name`.
    fn name(&self) -> &str;

    /// Process one occurrence of the directive.
    fn process(&mut self, args: DirectiveArgs, ctx: &DirectiveContext) -> DirectiveOutput;

    /// Register string replacements to apply after rendering.
    fn post_process(&mut self, _replacements: &mut Replacements) {}

    /// Warnings generated during processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}
