//! Error types for diagram options and rendering.

use std::path::PathBuf;

/// Malformed directive options, reported before anything is rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("a source file path is required")]
    MissingSource,
    #[error(r#"the "{0}" option is required"#)]
    MissingOption(&'static str),
    #[error(r#""{value}" is not a valid value for the "{option}" option; valid values are: "{allowed}""#)]
    InvalidChoice {
        option: &'static str,
        value: String,
        allowed: String,
    },
    #[error(r#""{value}" is not a valid value for the "{option}" option; expected {expected}"#)]
    InvalidValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error(r#"unknown option "{0}""#)]
    UnknownOption(String),
}

/// Failure to produce the SVG for one diagram.
///
/// Every variant is recovered per diagram: the directive emits nothing and
/// the build records a warning.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The tool could not be started or exited with a failure status.
    #[error("could not launch {tool} with command {command}: {reason}")]
    Launch {
        tool: &'static str,
        command: String,
        reason: String,
    },
    /// The tool succeeded but produced no file.
    #[error(
        "the output SVG file {} does not exist; this often means the diagram name is wrong",
        .0.display()
    )]
    MissingOutput(PathBuf),
    /// The post-process filter failed.
    #[error("postprocess command {command} failed: {reason}")]
    Postprocess { command: String, reason: String },
    /// A variable in the post-process command is not set.
    #[error("postprocess command {command} references unset variable ${name}")]
    Interpolation { command: String, name: String },
    /// No sequence diagram server could be determined.
    #[error(
        "web sequence diagram server not specified; use a server-url option, set diagrams.sequence_server_url or set {}",
        crate::consts::SEQUENCE_SERVER_ENV
    )]
    ServerNotConfigured,
    /// The HTTP exchange with the sequence diagram server failed.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The server reply carried no diagram token.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),
    /// Reading the source or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
