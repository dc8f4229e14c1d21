//! Optional SVG filter applied after rendering.
//!
//! The template may reference `$NAME` or `${NAME}` from the render
//! environment. It is split into words without a shell and run with the
//! rendered SVG on stdin; stdout becomes the final file.

use std::fs::File;
use std::path::Path;
use std::process::Stdio;

use crate::command::Command;
use crate::environment::RenderEnvironment;
use crate::error::RenderError;

/// Substitute environment variables into a post-process template.
///
/// # Errors
///
/// Returns [`RenderError::Interpolation`] naming the first unset variable.
pub fn interpolate(template: &str, env: &RenderEnvironment) -> Result<String, RenderError> {
    shellexpand::env_with_context(template, |name| match env.var(name) {
        Some(value) => Ok(Some(value)),
        None => Err(name.to_owned()),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| RenderError::Interpolation {
        command: template.to_owned(),
        name: e.cause,
    })
}

/// Parse a post-process template into a command.
///
/// # Errors
///
/// Returns an error if interpolation fails or the result is empty or has
/// unbalanced quotes.
pub fn parse_command(template: &str, env: &RenderEnvironment) -> Result<Command, RenderError> {
    let interpolated = interpolate(template, env)?;
    tracing::debug!(command = %interpolated, "Interpolated postprocess command");

    let words = shell_words::split(&interpolated).map_err(|e| RenderError::Postprocess {
        command: interpolated.clone(),
        reason: e.to_string(),
    })?;

    Command::from_words(words).ok_or_else(|| RenderError::Postprocess {
        command: template.to_owned(),
        reason: "command is empty".to_owned(),
    })
}

/// Pipe `input` through the post-process command into `output`.
///
/// The command is parsed before anything is spawned, so an unset variable
/// never starts a process.
///
/// # Errors
///
/// Returns an error if the command cannot be parsed or started, or exits
/// with a failure status.
pub fn apply(
    template: &str,
    input: &Path,
    output: &Path,
    env: &RenderEnvironment,
) -> Result<(), RenderError> {
    let command = parse_command(template, env)?;
    run(&command, input, output)
}

/// Run an already parsed filter with `input` on stdin and `output` as stdout.
///
/// # Errors
///
/// Returns an error if the files cannot be opened, the command cannot be
/// started, or it exits with a failure status.
pub fn run(command: &Command, input: &Path, output: &Path) -> Result<(), RenderError> {
    let stdin = File::open(input)?;
    let stdout = File::create(output)?;

    tracing::debug!(%command, input = %input.display(), output = %output.display(), "Running postprocess");
    let status = command
        .to_process()
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .status()
        .map_err(|e| RenderError::Postprocess {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(RenderError::Postprocess {
            command: command.to_string(),
            reason: format!("exited with {status}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Platform;

    fn env() -> RenderEnvironment {
        RenderEnvironment::from_vars(
            [("SVGTOOLS", "/opt/svg tools"), ("WIDTH", "640")],
            Platform::Other,
        )
    }

    #[test]
    fn test_interpolate_both_forms() {
        let result = interpolate("scour --width=$WIDTH --dir=${SVGTOOLS}", &env()).unwrap();
        assert_eq!(result, "scour --width=640 --dir=/opt/svg tools");
    }

    #[test]
    fn test_interpolate_unset_variable() {
        let err = interpolate("$SVGTOOLS/bin/filter --theme=$THEME", &env()).unwrap_err();
        assert!(matches!(err, RenderError::Interpolation { ref name, .. } if name == "THEME"));
    }

    #[test]
    fn test_interpolate_escaped_dollar() {
        let result = interpolate("echo $$WIDTH costs $$5 or $WIDTH$$", &env()).unwrap();
        assert_eq!(result, "echo $WIDTH costs $5 or 640$");
    }

    #[test]
    fn test_template_without_variables() {
        assert_eq!(interpolate("xmllint --format -", &env()).unwrap(), "xmllint --format -");
    }

    #[test]
    fn test_parse_command_respects_quotes_after_interpolation() {
        let command = parse_command(r#""$SVGTOOLS/filter" --in-place"#, &env()).unwrap();
        assert_eq!(command.argv(), ["/opt/svg tools/filter", "--in-place"]);
    }

    #[test]
    fn test_parse_command_empty() {
        let err = parse_command("  ", &env()).unwrap_err();
        assert!(matches!(err, RenderError::Postprocess { .. }));
    }

    #[test]
    fn test_unset_variable_fails_before_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.svg");
        let output = dir.path().join("out.svg");
        std::fs::write(&input, "<svg/>").unwrap();

        let err = apply("touch $MARKER", &input, &output, &env()).unwrap_err();

        assert!(matches!(err, RenderError::Interpolation { .. }));
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_filter_rewrites_svg() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.svg");
        let output = dir.path().join("out.svg");
        std::fs::write(&input, "<svg fill=\"red\"/>").unwrap();

        apply("sed s/red/blue/", &input, &output, &env()).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "<svg fill=\"blue\"/>");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_filter() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.svg");
        std::fs::write(&input, "<svg/>").unwrap();

        let err = apply("false", &input, &dir.path().join("out.svg"), &env()).unwrap_err();

        assert!(err.to_string().contains("postprocess command false failed"));
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.svg");
        std::fs::write(&input, "<svg/>").unwrap();

        let err = apply(
            "phix-no-such-filter-program",
            &input,
            &dir.path().join("out.svg"),
            &env(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderError::Postprocess { .. }));
    }
}
