//! Directive argument parsing.
//!
//! Parses the `[content]{#id .class key="value" flag}` syntax from directives.

use std::collections::HashMap;

/// Parsed arguments from directive syntax.
///
/// Represents the content and attributes extracted from a directive:
/// `::name[content]{#id .class key="value" flag}`
///
/// # Example
///
/// ```
/// use phix_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("flow.dia", r#"#main .wide width="80%" new-window"#);
/// assert_eq!(args.content, "flow.dia");
/// assert_eq!(args.id, Some("main".to_owned()));
/// assert_eq!(args.classes, vec!["wide"]);
/// assert_eq!(args.get("width"), Some("80%"));
/// assert!(args.has_flag("new-window"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Content from brackets: `[content]` (empty string if not provided).
    pub content: String,
    /// ID from attributes: `{#id}`.
    pub id: Option<String>,
    /// Classes from attributes: `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Key-value attributes: `{key="value"}`.
    pub attrs: HashMap<String, String>,
    /// Bare words without a value: `{new-window}`.
    pub flags: Vec<String>,
}

impl DirectiveArgs {
    /// Parse the bracket content and the brace attributes (without braces).
    ///
    /// Words that are not valid flag names are dropped.
    #[must_use]
    pub fn parse(content: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            content: content.to_owned(),
            ..Self::default()
        };

        let mut rest = attrs_str.trim();
        while !rest.is_empty() {
            let (attr, tail) = next_attr(rest);
            match attr {
                Attr::Id(id) => args.id = Some(id.to_owned()),
                Attr::Class(class) if !class.is_empty() => args.classes.push(class.to_owned()),
                Attr::Pair(key, value) => {
                    args.attrs.insert(key.to_owned(), value.to_owned());
                }
                Attr::Word(word) if is_flag_name(word) => args.flags.push(word.to_owned()),
                Attr::Class(_) | Attr::Word(_) => {}
            }
            rest = tail.trim_start();
        }

        args
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Check whether a bare flag was given.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
    }
}

/// One attribute inside the braces.
enum Attr<'a> {
    Id(&'a str),
    Class(&'a str),
    Pair(&'a str, &'a str),
    Word(&'a str),
}

/// Split the leading attribute off `s`, which starts with a non-space character.
fn next_attr(s: &str) -> (Attr<'_>, &str) {
    if let Some(rest) = s.strip_prefix('#') {
        let (name, rest) = split_name(rest);
        return (Attr::Id(name), rest);
    }
    if let Some(rest) = s.strip_prefix('.') {
        let (name, rest) = split_name(rest);
        return (Attr::Class(name), rest);
    }
    if let Some((key, value, rest)) = key_value(s) {
        return (Attr::Pair(key, value), rest);
    }
    let (word, rest) = s.split_at(s.find(char::is_whitespace).unwrap_or(s.len()));
    (Attr::Word(word), rest)
}

/// `#id` and `.class` names end at whitespace or the next `.` or `#`.
fn split_name(s: &str) -> (&str, &str) {
    s.split_at(
        s.find(|c: char| c.is_whitespace() || matches!(c, '.' | '#'))
            .unwrap_or(s.len()),
    )
}

/// `key="value"`, `key='value'` or `key=value`; the key is one word.
fn key_value(s: &str) -> Option<(&str, &str, &str)> {
    let (key, after) = s.split_once('=')?;
    if key.is_empty() || key.contains(char::is_whitespace) || key.starts_with(['#', '.']) {
        return None;
    }

    match after.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let quoted = &after[1..];
            let close = quoted.find(quote)?;
            Some((key, &quoted[..close], &quoted[close + 1..]))
        }
        _ => {
            let (value, rest) = after.split_at(after.find(char::is_whitespace).unwrap_or(after.len()));
            Some((key, value, rest))
        }
    }
}

fn is_flag_name(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}
