//! The table of supported diagram tools.

use std::fmt;

/// Diagram tool behind one directive.
///
/// The per-tool differences (directive name, launch override, Windows install
/// location, whether a diagram name is required) live here so the pipeline is
/// written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    ArgoUml,
    Dia,
    Inkscape,
    SequenceDiagram,
}

impl Backend {
    /// All backends, in registration order.
    pub const ALL: [Self; 4] = [
        Self::ArgoUml,
        Self::Dia,
        Self::Inkscape,
        Self::SequenceDiagram,
    ];

    /// Directive name, also used as the CSS class of the embed.
    #[must_use]
    pub fn directive_name(self) -> &'static str {
        match self {
            Self::ArgoUml => "argouml",
            Self::Dia => "dia",
            Self::Inkscape => "inkscape",
            Self::SequenceDiagram => "websequencediagram",
        }
    }

    /// Human-readable tool name for messages.
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::ArgoUml => "ArgoUML",
            Self::Dia => "Dia",
            Self::Inkscape => "Inkscape",
            Self::SequenceDiagram => "web sequence diagram server",
        }
    }

    /// Environment variable holding a launch command override.
    ///
    /// `None` for the remote backend, which launches nothing.
    #[must_use]
    pub fn launch_var(self) -> Option<&'static str> {
        match self {
            Self::ArgoUml => Some("ARGOUML_LAUNCH"),
            Self::Dia => Some("DIA_LAUNCH"),
            Self::Inkscape => Some("INKSCAPE_LAUNCH"),
            Self::SequenceDiagram => None,
        }
    }

    /// Whether sources hold several diagrams selected by name.
    #[must_use]
    pub fn has_named_diagrams(self) -> bool {
        matches!(self, Self::ArgoUml)
    }

    /// Look up a backend by directive name.
    #[must_use]
    pub fn from_directive_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.directive_name() == name)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_name())
    }
}
