//! Directive syntax parsing.
//!
//! Parses `CommonMark` directive syntax: `:name[...]{...}` and `::name[...]{...}`.

use super::DirectiveArgs;

/// Parsed directive from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedDirective {
    /// Inline directive: `:name[content]{attrs}`
    Inline { name: String, args: DirectiveArgs },
    /// Leaf directive: `::name[content]{attrs}`
    Leaf { name: String, args: DirectiveArgs },
}

/// Find the first directive in a line.
///
/// Returns the directive with its start and end byte offsets, or `None` if
/// the line contains no directive. Colon runs that do not start a valid
/// directive (`Note: ...`, `https://...`, `:::`) are skipped.
pub(crate) fn parse_line(line: &str) -> Option<(ParsedDirective, usize, usize)> {
    let mut search_from = 0;

    while let Some(offset) = line[search_from..].find(':') {
        let start = search_from + offset;
        let colon_count = line[start..].chars().take_while(|&c| c == ':').count();

        if colon_count <= 2
            && let Some((directive, end)) = parse_at(line, start, colon_count)
        {
            return Some((directive, start, end));
        }

        search_from = start + colon_count;
    }

    None
}

/// Parse a directive whose colons start at `start`.
fn parse_at(line: &str, start: usize, colon_count: usize) -> Option<(ParsedDirective, usize)> {
    let mut pos = start + colon_count;
    let after_colons = &line[pos..];

    // Name ends at [, {, or whitespace
    let name_end = after_colons
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(after_colons.len());

    let name = &after_colons[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    pos += name_end;

    let (content, content_consumed) = parse_delimited(&line[pos..], '[', ']');
    pos += content_consumed;

    let (attrs_str, attrs_consumed) = parse_delimited(&line[pos..], '{', '}');
    pos += attrs_consumed;

    // A bare `:word` is ordinary text, not a directive.
    if content_consumed == 0 && attrs_consumed == 0 {
        return None;
    }

    let args = DirectiveArgs::parse(&content, &attrs_str);
    let name = name.to_owned();

    let directive = if colon_count == 1 {
        ParsedDirective::Inline { name, args }
    } else {
        ParsedDirective::Leaf { name, args }
    };

    Some((directive, pos))
}

/// Check if a name is a valid directive name.
///
/// Valid names contain only alphanumeric characters, hyphens, and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Parse a delimited group such as `[content]` or `{attrs}`, handling nesting.
///
/// Returns (inner text, `bytes_consumed`). Nothing is consumed when the group
/// is absent or unclosed.
fn parse_delimited(s: &str, open: char, close: char) -> (String, usize) {
    if !s.starts_with(open) {
        return (String::new(), 0);
    }

    let mut depth = 0;

    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (s[1..i].to_owned(), i + 1);
            }
        }
    }

    (String::new(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_directive() {
        let (directive, start, end) = parse_line("Status :dia[icons/ok.dia] here.").unwrap();

        assert_eq!(start, 7);
        assert_eq!(end, 25);
        match directive {
            ParsedDirective::Inline { name, args } => {
                assert_eq!(name, "dia");
                assert_eq!(args.content, "icons/ok.dia");
            }
            ParsedDirective::Leaf { .. } => panic!("expected inline directive"),
        }
    }

    #[test]
    fn test_leaf_with_attrs() {
        let (directive, _, _) =
            parse_line(r#"::argouml[model.zargo]{diagram="Class Diagram" .wide}"#).unwrap();

        match directive {
            ParsedDirective::Leaf { name, args } => {
                assert_eq!(name, "argouml");
                assert_eq!(args.content, "model.zargo");
                assert_eq!(args.get("diagram"), Some("Class Diagram"));
                assert_eq!(args.classes, vec!["wide"]);
            }
            ParsedDirective::Inline { .. } => panic!("expected leaf directive"),
        }
    }

    #[test]
    fn test_skips_prose_colons() {
        let (directive, start, _) = parse_line("Note: see :dia[a.dia] too").unwrap();
        assert_eq!(start, 10);
        assert!(matches!(directive, ParsedDirective::Inline { name, .. } if name == "dia"));
    }

    #[test]
    fn test_skips_urls() {
        assert!(parse_line("See https://example.com/x for details").is_none());
    }

    #[test]
    fn test_container_syntax_is_not_a_directive() {
        assert!(parse_line(":::note[Title]").is_none());
        assert!(parse_line(":::").is_none());
    }

    #[test]
    fn test_bare_word_is_not_a_directive() {
        assert!(parse_line("time 10:30 and :smile").is_none());
    }

    #[test]
    fn test_not_directive() {
        assert!(parse_line("regular text").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_invalid_name() {
        assert!(parse_line(":foo@bar[content]").is_none());
        assert!(parse_line(":[content]").is_none());
    }

    #[test]
    fn test_parse_delimited() {
        assert_eq!(parse_delimited("[hello]", '[', ']'), ("hello".to_owned(), 7));
        assert_eq!(
            parse_delimited("[nested [brackets]]", '[', ']'),
            ("nested [brackets]".to_owned(), 19)
        );
        assert_eq!(parse_delimited("{#id} rest", '{', '}'), ("#id".to_owned(), 5));
        assert_eq!(parse_delimited("no brackets", '[', ']'), (String::new(), 0));
        assert_eq!(parse_delimited("[unclosed", '[', ']'), (String::new(), 0));
    }

    #[test]
    fn test_multiple_directives_finds_first() {
        let (directive, start, _) = parse_line(":a[1] :b[2]").unwrap();
        assert_eq!(start, 0);
        assert!(matches!(directive, ParsedDirective::Inline { name, .. } if name == "a"));
    }
}
