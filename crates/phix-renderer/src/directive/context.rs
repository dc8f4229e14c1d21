//! Directive processing context.
//!
//! Provides source location information to directive handlers.

use std::path::{Component, Path, PathBuf};

/// Where a directive appears in the document.
///
/// Inline directives sit inside a line of text the way a substitution
/// definition does, so handlers may validate options differently for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// `:name[...]` inside running text.
    Inline,
    /// `::name[...]` as a block of its own.
    Block,
}

/// Context provided to directive handlers for source location.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use phix_renderer::directive::{DirectiveContext, Placement};
///
/// let ctx = DirectiveContext {
///     source_path: Some(Path::new("docs/guide.md")),
///     base_dir: Path::new("docs"),
///     line: 42,
///     placement: Placement::Block,
/// };
///
/// let resolved = ctx.resolve_path("diagrams/../diagrams/flow.dia");
/// assert_eq!(resolved, Path::new("docs/diagrams/flow.dia"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DirectiveContext<'a> {
    /// Path to the source file being rendered (if known).
    pub source_path: Option<&'a Path>,
    /// Base directory for resolving relative paths.
    pub base_dir: &'a Path,
    /// Line number where the directive appears (1-indexed).
    pub line: usize,
    /// Whether the directive is inline or a block.
    pub placement: Placement,
}

impl DirectiveContext<'_> {
    /// Resolve a path against the base directory and normalize it lexically.
    ///
    /// Absolute paths replace the base directory. `.` components are dropped
    /// and `..` components pop the previous component where possible.
    #[must_use]
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        normalize_path(&self.base_dir.join(relative))
    }

    /// Describe the directive location for diagnostics (`guide.md:12`).
    #[must_use]
    pub fn location(&self) -> String {
        match self.source_path {
            Some(path) => format!("{}:{}", path.display(), self.line),
            None => format!("line {}", self.line),
        }
    }
}

/// Normalize a path without touching the file system.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
