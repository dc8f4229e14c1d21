//! What to render: the source artifact and backend-specific fields.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::backend::Backend;

/// Visual style offered by web sequence diagram servers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceStyle {
    Default,
    Earth,
    ModernBlue,
    Mscgen,
    Omegapple,
    Qsd,
    Rose,
    RoundGreen,
    Napkin,
    #[default]
    Vs2010,
}

impl SequenceStyle {
    pub const ALL: [Self; 10] = [
        Self::Default,
        Self::Earth,
        Self::ModernBlue,
        Self::Mscgen,
        Self::Omegapple,
        Self::Qsd,
        Self::Rose,
        Self::RoundGreen,
        Self::Napkin,
        Self::Vs2010,
    ];

    /// Name sent to the server.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Earth => "earth",
            Self::ModernBlue => "modern-blue",
            Self::Mscgen => "mscgen",
            Self::Omegapple => "omegapple",
            Self::Qsd => "qsd",
            Self::Rose => "rose",
            Self::RoundGreen => "roundgreen",
            Self::Napkin => "napkin",
            Self::Vs2010 => "vs2010",
        }
    }

    /// Valid names joined as `a", "b`, to be wrapped in quotes by the caller.
    #[must_use]
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(r#"", ""#)
    }
}

/// A style name no server knows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(r#"unknown sequence diagram style "{0}""#)]
pub struct UnknownStyle(pub String);

impl FromStr for SequenceStyle {
    type Err = UnknownStyle;

    /// Parse a style name. Names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownStyle(s.to_owned()))
    }
}

impl fmt::Display for SequenceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagram to render, carrying only the fields its backend needs.
///
/// `source` is the document-resolved, normalized path of the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramReference {
    ArgoUml {
        source: PathBuf,
        diagram: String,
    },
    Dia {
        source: PathBuf,
    },
    Inkscape {
        source: PathBuf,
    },
    SequenceDiagram {
        source: PathBuf,
        style: SequenceStyle,
        api_version: String,
        server_url: Option<String>,
    },
}

impl DiagramReference {
    #[must_use]
    pub fn backend(&self) -> Backend {
        match self {
            Self::ArgoUml { .. } => Backend::ArgoUml,
            Self::Dia { .. } => Backend::Dia,
            Self::Inkscape { .. } => Backend::Inkscape,
            Self::SequenceDiagram { .. } => Backend::SequenceDiagram,
        }
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        match self {
            Self::ArgoUml { source, .. }
            | Self::Dia { source }
            | Self::Inkscape { source }
            | Self::SequenceDiagram { source, .. } => source,
        }
    }

    /// Name of the diagram inside a multi-diagram source.
    #[must_use]
    pub fn diagram_name(&self) -> Option<&str> {
        match self {
            Self::ArgoUml { diagram, .. } => Some(diagram),
            _ => None,
        }
    }
}
