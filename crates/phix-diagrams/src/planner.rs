//! Output path planning and the existence cache.
//!
//! The render path is a pure function of the source stem, the diagram name
//! and the output layout. A file already at that path is a cache hit.

use std::io;
use std::path::{Path, PathBuf};

/// Where rendered diagrams go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Build output root.
    pub root: PathBuf,
    /// Image directory under `root` used for HTML output.
    pub image_dir: String,
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, image_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            image_dir: image_dir.into(),
        }
    }
}

/// Paths for one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    /// Path written into the page, `/`-separated.
    pub reference_path: String,
    /// File the renderer writes.
    pub render_path: PathBuf,
    /// A file already exists at `render_path`.
    pub cached: bool,
}

/// Output filename: `<stem>.svg`, or `<stem>-<diagram>.svg` with spaces in
/// the diagram name replaced by underscores.
///
/// # Errors
///
/// Returns `InvalidInput` if `source` has no file name.
pub fn diagram_filename(source: &Path, diagram: Option<&str>) -> io::Result<String> {
    let stem = source.file_stem().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not name a file", source.display()),
        )
    })?;
    let stem = stem.to_string_lossy();

    Ok(match diagram {
        Some(name) => format!("{stem}-{}.svg", name.replace(' ', "_")),
        None => format!("{stem}.svg"),
    })
}

/// Plan the output of one diagram.
///
/// With an `image_path` (HTML output, image directory relative to the page)
/// the reference is `<image_path>/<file>` and the render path
/// `<root>/<image_dir>/<file>`. Without one (print output) both are the bare
/// filename under the output root.
///
/// On a cache miss the render path's parent directory is created.
///
/// # Errors
///
/// Returns an error if the filename cannot be derived or the directory cannot
/// be created.
pub fn plan_output(
    source: &Path,
    diagram: Option<&str>,
    layout: &OutputLayout,
    image_path: Option<&str>,
) -> io::Result<PlannedOutput> {
    let filename = diagram_filename(source, diagram)?;

    let (reference_path, render_path) = match image_path {
        Some(image_path) => (
            join_url(image_path, &filename),
            layout.root.join(&layout.image_dir).join(&filename),
        ),
        None => (filename.clone(), layout.root.join(&filename)),
    };

    if render_path.is_file() {
        tracing::debug!(path = %render_path.display(), "Diagram already rendered");
        return Ok(PlannedOutput {
            reference_path,
            render_path,
            cached: true,
        });
    }

    if let Some(parent) = render_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(PlannedOutput {
        reference_path,
        render_path,
        cached: false,
    })
}

fn join_url(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        name.to_owned()
    } else {
        format!("{base}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_filename_plain() {
        let name = diagram_filename(Path::new("/docs/flow.dia"), None).unwrap();
        assert_eq!(name, "flow.svg");
    }

    #[test]
    fn test_filename_named_diagram() {
        let name = diagram_filename(Path::new("/docs/model.zargo"), Some("Class Diagram")).unwrap();
        assert_eq!(name, "model-Class_Diagram.svg");
    }

    #[test]
    fn test_filename_keeps_inner_dots() {
        let name = diagram_filename(Path::new("logo.v2.svg"), None).unwrap();
        assert_eq!(name, "logo.v2.svg");
    }

    #[test]
    fn test_filename_requires_file() {
        let err = diagram_filename(Path::new("/"), None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_html_plan_creates_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path().join("out"), "_images");

        let plan = plan_output(Path::new("/src/flow.dia"), None, &layout, Some("../_images")).unwrap();

        assert_eq!(plan.reference_path, "../_images/flow.svg");
        assert_eq!(plan.render_path, dir.path().join("out/_images/flow.svg"));
        assert!(!plan.cached);
        assert!(dir.path().join("out/_images").is_dir());
    }

    #[test]
    fn test_custom_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "assets/diagrams");

        let plan = plan_output(Path::new("seq.txt"), None, &layout, Some("assets/diagrams/")).unwrap();

        assert_eq!(plan.reference_path, "assets/diagrams/seq.svg");
        assert_eq!(plan.render_path, dir.path().join("assets/diagrams/seq.svg"));
    }

    #[test]
    fn test_print_plan_uses_bare_filename() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "_images");

        let plan = plan_output(Path::new("/src/model.zargo"), Some("Use Cases"), &layout, None).unwrap();

        assert_eq!(plan.reference_path, "model-Use_Cases.svg");
        assert_eq!(plan.render_path, dir.path().join("model-Use_Cases.svg"));
    }

    #[test]
    fn test_existing_file_is_cache_hit() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "_images");
        std::fs::create_dir_all(dir.path().join("_images")).unwrap();
        std::fs::write(dir.path().join("_images/flow.svg"), "<svg/>").unwrap();

        let plan = plan_output(Path::new("flow.dia"), None, &layout, Some("_images")).unwrap();

        assert!(plan.cached);
        assert_eq!(plan.reference_path, "_images/flow.svg");
    }

    #[test]
    fn test_empty_image_path() {
        assert_eq!(join_url("", "a.svg"), "a.svg");
    }
}
