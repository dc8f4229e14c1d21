//! Directive option parsing and validation.

use std::sync::LazyLock;

use phix_renderer::directive::{DirectiveArgs, DirectiveContext, Placement};
use regex::Regex;

use crate::backend::Backend;
use crate::consts::DEFAULT_API_VERSION;
use crate::error::OptionError;
use crate::reference::{DiagramReference, SequenceStyle};

static LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s*(em|ex|px|in|cm|mm|pt|pc)?$").unwrap());

static LENGTH_OR_PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s*(em|ex|px|in|cm|mm|pt|pc|%)?$").unwrap()
});

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s*%?$").unwrap());

const COMMON_OPTIONS: &[&str] = &[
    "postprocess",
    "alt",
    "height",
    "width",
    "scale",
    "align",
    "border",
    "class",
];

const SEQUENCE_OPTIONS: &[&str] = &["style", "api-version", "server-url"];

/// Alignment of the embedded diagram.
///
/// Block directives take a horizontal value; inline directives, which stand
/// in a line of text, take a vertical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl Align {
    const HORIZONTAL: [Self; 3] = [Self::Left, Self::Center, Self::Right];
    const VERTICAL: [Self; 3] = [Self::Top, Self::Middle, Self::Bottom];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }

    /// Parse an alignment valid for `placement`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::InvalidChoice`] listing the values allowed here.
    pub fn parse(value: &str, placement: Placement) -> Result<Self, OptionError> {
        let allowed: &[Self] = match placement {
            Placement::Block => &Self::HORIZONTAL,
            Placement::Inline => &Self::VERTICAL,
        };
        allowed
            .iter()
            .copied()
            .find(|a| a.as_str() == value)
            .ok_or_else(|| OptionError::InvalidChoice {
                option: "align",
                value: value.to_owned(),
                allowed: allowed
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(r#"", ""#),
            })
    }
}

/// How the rendered SVG is embedded in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    pub width: String,
    pub height: String,
    pub border: u32,
    pub alt: Option<String>,
    pub classes: Vec<String>,
    pub align: Option<Align>,
    /// Validated but not applied; SVG scales with its container.
    pub scale: Option<u32>,
    pub new_window: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            width: "100%".to_owned(),
            height: "100%".to_owned(),
            border: 0,
            alt: None,
            classes: Vec::new(),
            align: None,
            scale: None,
            new_window: false,
        }
    }
}

/// Sequence diagram settings used when a directive gives none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub style: SequenceStyle,
    pub api_version: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            style: SequenceStyle::default(),
            api_version: DEFAULT_API_VERSION.to_owned(),
        }
    }
}

/// Everything needed to render and embed one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub reference: DiagramReference,
    pub embed: EmbedOptions,
    /// Post-process command template.
    pub postprocess: Option<String>,
}

/// Build a render request from directive arguments.
///
/// The bracket content is the source path, resolved against the document's
/// directory.
///
/// # Errors
///
/// Returns the first invalid or missing option.
pub fn parse_request(
    backend: Backend,
    args: &DirectiveArgs,
    ctx: &DirectiveContext<'_>,
    defaults: &RequestDefaults,
) -> Result<RenderRequest, OptionError> {
    check_known_options(backend, args)?;

    let source = args.content.trim();
    if source.is_empty() {
        return Err(OptionError::MissingSource);
    }
    let source = ctx.resolve_path(source);

    let reference = match backend {
        Backend::ArgoUml => {
            let diagram = args
                .get("diagram")
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .ok_or(OptionError::MissingOption("diagram"))?;
            DiagramReference::ArgoUml {
                source,
                diagram: diagram.to_owned(),
            }
        }
        Backend::Dia => DiagramReference::Dia { source },
        Backend::Inkscape => DiagramReference::Inkscape { source },
        Backend::SequenceDiagram => {
            let style = match args.get("style") {
                Some(value) => value.parse::<SequenceStyle>().map_err(|_| OptionError::InvalidChoice {
                    option: "style",
                    value: value.to_owned(),
                    allowed: SequenceStyle::names(),
                })?,
                None => defaults.style,
            };
            DiagramReference::SequenceDiagram {
                source,
                style,
                api_version: args
                    .get("api-version")
                    .unwrap_or(defaults.api_version.as_str())
                    .to_owned(),
                server_url: args.get("server-url").map(str::to_owned),
            }
        }
    };

    Ok(RenderRequest {
        reference,
        embed: parse_embed(args, ctx.placement)?,
        postprocess: args.get("postprocess").map(str::to_owned),
    })
}

fn check_known_options(backend: Backend, args: &DirectiveArgs) -> Result<(), OptionError> {
    let known = |key: &str| {
        COMMON_OPTIONS.contains(&key)
            || (backend.has_named_diagrams() && key == "diagram")
            || (backend == Backend::SequenceDiagram && SEQUENCE_OPTIONS.contains(&key))
    };

    let mut keys: Vec<&String> = args.attrs.keys().collect();
    keys.sort();
    if let Some(key) = keys.into_iter().find(|k| !known(k.as_str())) {
        return Err(OptionError::UnknownOption(key.clone()));
    }
    if let Some(flag) = args.flags.iter().find(|f| f.as_str() != "new-window") {
        return Err(OptionError::UnknownOption(flag.clone()));
    }
    Ok(())
}

fn parse_embed(args: &DirectiveArgs, placement: Placement) -> Result<EmbedOptions, OptionError> {
    let mut embed = EmbedOptions {
        alt: args.get("alt").map(str::to_owned),
        new_window: args.has_flag("new-window"),
        ..EmbedOptions::default()
    };

    if let Some(value) = args.get("width") {
        embed.width = length(value, "width", &LENGTH_OR_PERCENT_RE)?;
    }
    if let Some(value) = args.get("height") {
        embed.height = length(value, "height", &LENGTH_RE)?;
    }
    if let Some(value) = args.get("border") {
        embed.border = value
            .trim()
            .parse()
            .map_err(|_| invalid("border", value, "a non-negative integer"))?;
    }
    if let Some(value) = args.get("scale") {
        let caps = PERCENT_RE
            .captures(value.trim())
            .ok_or_else(|| invalid("scale", value, "a percentage"))?;
        embed.scale = Some(
            caps[1]
                .parse()
                .map_err(|_| invalid("scale", value, "a percentage"))?,
        );
    }
    if let Some(value) = args.get("align") {
        embed.align = Some(Align::parse(value, placement)?);
    }

    let class_option = args.get("class").unwrap_or_default();
    for class in args.classes.iter().map(String::as_str).chain(class_option.split_whitespace()) {
        let class = normalize_class(class);
        if class.is_empty() {
            return Err(invalid("class", class_option, "valid class names"));
        }
        if !embed.classes.contains(&class) {
            embed.classes.push(class);
        }
    }

    Ok(embed)
}

/// Validate a length and strip whitespace between number and unit.
fn length(value: &str, option: &'static str, re: &Regex) -> Result<String, OptionError> {
    let trimmed = value.trim();
    let caps = re.captures(trimmed).ok_or_else(|| {
        invalid(
            option,
            value,
            if option == "width" {
                "a length, a percentage or a unitless number"
            } else {
                "a length or a unitless number"
            },
        )
    })?;
    Ok(format!(
        "{}{}",
        &caps[1],
        caps.get(2).map_or("", |unit| unit.as_str())
    ))
}

/// Lowercase a class name and collapse anything else into single hyphens.
fn normalize_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    for c in class.chars().map(|c| c.to_ascii_lowercase()) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-')
        .trim_end_matches('-')
        .to_owned()
}

fn invalid(option: &'static str, value: &str, expected: &'static str) -> OptionError {
    OptionError::InvalidValue {
        option,
        value: value.to_owned(),
        expected,
    }
}
