//! Renderer backends.
//!
//! [`SystemRenderer`] runs the real tools: a local process for ArgoUML, Dia
//! and Inkscape, an HTTP exchange for web sequence diagrams.

mod local;
pub mod sequence;

use std::path::Path;

use ureq::Agent;

use crate::environment::RenderEnvironment;
use crate::error::RenderError;
use crate::reference::DiagramReference;

/// Produces the SVG for a diagram reference at a destination path.
pub trait DiagramRenderer: Send + Sync {
    /// Render `reference` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns the reason the SVG could not be produced.
    fn render(
        &self,
        reference: &DiagramReference,
        destination: &Path,
        env: &RenderEnvironment,
    ) -> Result<(), RenderError>;
}

/// Renderer backed by the installed tools and the sequence diagram server.
pub struct SystemRenderer {
    agent: Agent,
    default_server_url: Option<String>,
}

impl SystemRenderer {
    /// Create a renderer with the given HTTP agent.
    #[must_use]
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            default_server_url: None,
        }
    }

    /// Server used when neither the environment nor the directive names one.
    #[must_use]
    pub fn with_default_server_url(mut self, url: Option<String>) -> Self {
        self.default_server_url = url;
        self
    }
}

impl DiagramRenderer for SystemRenderer {
    fn render(
        &self,
        reference: &DiagramReference,
        destination: &Path,
        env: &RenderEnvironment,
    ) -> Result<(), RenderError> {
        match reference {
            DiagramReference::SequenceDiagram {
                source,
                style,
                api_version,
                server_url,
            } => {
                let server_url = sequence::resolve_server_url(
                    env,
                    server_url.as_deref(),
                    self.default_server_url.as_deref(),
                )?;
                let message = std::fs::read_to_string(source)?;
                let request = sequence::SequenceRequest {
                    message: &message,
                    style: *style,
                    api_version,
                    server_url: &server_url,
                };
                sequence::render(&self.agent, &request, destination)
            }
            _ => local::render(reference, destination, env),
        }
    }
}
