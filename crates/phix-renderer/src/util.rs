//! Path helpers shared by directive handlers.

/// Relative URL from the document at `from` to the resource at `to`.
///
/// Both arguments are `/`-separated paths relative to the output root. The
/// last segment of `from` names the document itself, so the base directory is
/// everything before it. A trailing slash marks `from` as a directory.
///
/// ```
/// use phix_renderer::relative_path;
///
/// assert_eq!(relative_path("index.html", "_images/flow.svg"), "_images/flow.svg");
/// assert_eq!(relative_path("guide/setup.html", "_images/flow.svg"), "../_images/flow.svg");
/// ```
#[must_use]
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let base = match from_segs.split_last() {
        Some((_, dir)) if !from.ends_with('/') => dir,
        _ => &from_segs[..],
    };

    let shared = base
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = "../".repeat(base.len() - shared);
    result.push_str(&to_segs[shared..].join("/"));

    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_document() {
        assert_eq!(relative_path("guide/a.html", "guide/b.svg"), "b.svg");
    }

    #[test]
    fn test_nested_page_to_image_dir() {
        assert_eq!(
            relative_path("guide/design/model.html", "_images/model-Class_Diagram.svg"),
            "../../_images/model-Class_Diagram.svg"
        );
    }

    #[test]
    fn test_directory_source() {
        assert_eq!(relative_path("guide/", "guide/x.svg"), "x.svg");
    }

    #[test]
    fn test_same_directory() {
        assert_eq!(relative_path("guide/a.html", "guide"), "./");
        assert_eq!(relative_path("", ""), "./");
    }
}
