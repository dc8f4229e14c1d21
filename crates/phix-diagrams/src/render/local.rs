//! Local tool backends: ArgoUML, Dia and Inkscape.

use std::path::Path;

use crate::command::{Command, resolve_command};
use crate::environment::RenderEnvironment;
use crate::error::RenderError;
use crate::reference::DiagramReference;

/// Tool arguments appended to the launch command.
///
/// Returns an empty list for the remote backend.
pub(crate) fn tool_args(reference: &DiagramReference, destination: &Path) -> Vec<String> {
    let destination = destination.display();
    match reference {
        DiagramReference::ArgoUml { source, diagram } => vec![
            "-batch".to_owned(),
            "-command".to_owned(),
            format!("org.argouml.uml.ui.ActionOpenProject={}", source.display()),
            "-command".to_owned(),
            format!("org.argouml.ui.cmd.ActionGotoDiagram={diagram}"),
            "-command".to_owned(),
            format!("org.argouml.uml.ui.ActionSaveGraphics={destination}"),
        ],
        DiagramReference::Dia { source } => vec![
            source.display().to_string(),
            "-e".to_owned(),
            destination.to_string(),
        ],
        DiagramReference::Inkscape { source } => vec![
            source.display().to_string(),
            "--vacuum-defs".to_owned(),
            format!("--export-plain-svg={destination}"),
        ],
        DiagramReference::SequenceDiagram { .. } => Vec::new(),
    }
}

/// Full command line for a local render.
pub(crate) fn build_command(
    reference: &DiagramReference,
    destination: &Path,
    env: &RenderEnvironment,
) -> Option<Command> {
    resolve_command(reference.backend(), env).map(|c| c.args(tool_args(reference, destination)))
}

/// Run the tool for `reference`, writing SVG to `destination`.
///
/// The tool inherits stdio and runs to completion.
pub(crate) fn render(
    reference: &DiagramReference,
    destination: &Path,
    env: &RenderEnvironment,
) -> Result<(), RenderError> {
    let backend = reference.backend();
    let Some(command) = build_command(reference, destination, env) else {
        return Err(RenderError::Launch {
            tool: backend.tool_name(),
            command: String::new(),
            reason: "no local command for this backend".to_owned(),
        });
    };

    tracing::debug!(%command, "Launching {}", backend.tool_name());
    let status = command
        .to_process()
        .status()
        .map_err(|e| RenderError::Launch {
            tool: backend.tool_name(),
            command: command.to_string(),
            reason: e.to_string(),
        })?;
    tracing::debug!(%status, "{} finished", backend.tool_name());

    if !status.success() {
        return Err(RenderError::Launch {
            tool: backend.tool_name(),
            command: command.to_string(),
            reason: format!("exited with {status}"),
        });
    }

    // A wrong diagram name makes ArgoUML exit cleanly without saving anything
    if reference.backend().has_named_diagrams() && !destination.exists() {
        return Err(RenderError::MissingOutput(destination.to_path_buf()));
    }

    Ok(())
}
