//! Web sequence diagram backend.
//!
//! One form POST returns a line containing a `?svg=<token>` fragment; a GET of
//! the server URL plus that fragment returns the SVG.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use ureq::Agent;

use crate::consts::SEQUENCE_SERVER_ENV;
use crate::environment::RenderEnvironment;
use crate::error::RenderError;
use crate::reference::SequenceStyle;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?(png|pdf|svg)=[a-zA-Z0-9]+").unwrap());

/// Create an HTTP agent. `None` means no timeout.
pub fn create_agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build()
        .into()
}

/// Pick the server URL: environment override, then the directive option,
/// then the configured default.
///
/// # Errors
///
/// Returns [`RenderError::ServerNotConfigured`] when none is set.
pub fn resolve_server_url(
    env: &RenderEnvironment,
    directive: Option<&str>,
    configured: Option<&str>,
) -> Result<String, RenderError> {
    env.var(SEQUENCE_SERVER_ENV)
        .or(directive)
        .or(configured)
        .filter(|url| !url.trim().is_empty())
        .map(str::to_owned)
        .ok_or(RenderError::ServerNotConfigured)
}

/// Extract the `?<format>=<token>` fragment from the first response line.
pub(crate) fn parse_token(line: &str) -> Option<&str> {
    TOKEN_RE.find(line).map(|m| m.as_str())
}

/// Fields of one sequence diagram request.
#[derive(Debug)]
pub(crate) struct SequenceRequest<'a> {
    pub message: &'a str,
    pub style: SequenceStyle,
    pub api_version: &'a str,
    pub server_url: &'a str,
}

/// Render `request` and save the SVG at `destination`.
pub(crate) fn render(
    agent: &Agent,
    request: &SequenceRequest<'_>,
    destination: &Path,
) -> Result<(), RenderError> {
    let server_url = request.server_url;
    tracing::debug!(%server_url, style = %request.style, "Requesting sequence diagram");

    let response = agent
        .post(server_url)
        .send_form([
            ("message", request.message),
            ("style", request.style.as_str()),
            ("apiVersion", request.api_version),
            ("format", "svg"),
        ])
        .map_err(|e| RenderError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| RenderError::Http(e.to_string()))?;
    if status >= 400 {
        return Err(RenderError::Http(format!("HTTP {status} from {server_url}")));
    }

    let line = body.lines().next().unwrap_or_default();
    tracing::debug!(response = %line, "Sequence server response");
    let token = parse_token(line).ok_or_else(|| RenderError::InvalidResponse(line.to_owned()))?;

    let image_url = format!("{server_url}{token}");
    let response = agent
        .get(&image_url)
        .call()
        .map_err(|e| RenderError::Http(e.to_string()))?;
    let status = response.status().as_u16();
    if status >= 400 {
        return Err(RenderError::Http(format!("HTTP {status} from {image_url}")));
    }
    let svg = response
        .into_body()
        .read_to_vec()
        .map_err(|e| RenderError::Http(e.to_string()))?;

    std::fs::write(destination, svg)?;
    Ok(())
}
