//! Launch commands for the local diagram tools.

use std::fmt;

use crate::backend::Backend;
use crate::consts::WINDOWS_PROGRAM_FILES;
use crate::environment::{Platform, RenderEnvironment};

/// Argument vector for an external process. The first element is the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
}

impl Command {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            argv: vec![program.into()],
        }
    }

    /// Build a command from pre-split words. `None` when `words` is empty.
    #[must_use]
    pub fn from_words(words: Vec<String>) -> Option<Self> {
        (!words.is_empty()).then_some(Self { argv: words })
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.argv[1..]
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// A `std::process::Command` ready to spawn, with inherited stdio.
    #[must_use]
    pub fn to_process(&self) -> std::process::Command {
        let mut process = std::process::Command::new(self.program());
        process.args(self.arguments());
        process
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

/// Resolve the launch command for a local backend.
///
/// A `<BACKEND>_LAUNCH` override is split with shell quoting rules and used
/// as-is. Without one, the platform default applies. An override that yields
/// no words or has unbalanced quotes is ignored with a warning.
///
/// Returns `None` for the remote sequence diagram backend.
#[must_use]
pub fn resolve_command(backend: Backend, env: &RenderEnvironment) -> Option<Command> {
    let var = backend.launch_var()?;

    if let Some(value) = env.var(var) {
        match shell_words::split(value) {
            Ok(words) => {
                if let Some(command) = Command::from_words(words) {
                    tracing::debug!(%var, %command, "Using launch override");
                    return Some(command);
                }
                tracing::warn!(%var, "Launch override is empty, using the default command");
            }
            Err(e) => {
                tracing::warn!(%var, error = %e, "Cannot parse launch override, using the default command");
            }
        }
    }

    default_command(backend, env)
}

fn default_command(backend: Backend, env: &RenderEnvironment) -> Option<Command> {
    let command = if env.platform() == Platform::Windows {
        let pf32 = program_files_32(env);
        match backend {
            Backend::ArgoUml => Command::new("java").args([
                "-Xms64m".to_owned(),
                "-Xmx512m".to_owned(),
                "-jar".to_owned(),
                format!(r"{pf32}\ArgoUML\argouml.jar"),
            ]),
            Backend::Dia => Command::new(format!(r"{pf32}\Dia\bin\diaw.exe")),
            Backend::Inkscape => Command::new(format!(r"{pf32}\Inkscape\inkscape.exe")),
            Backend::SequenceDiagram => return None,
        }
    } else {
        match backend {
            Backend::ArgoUml => Command::new("argouml"),
            Backend::Dia => Command::new("dia"),
            Backend::Inkscape => Command::new("inkscape"),
            Backend::SequenceDiagram => return None,
        }
    };
    Some(command)
}

/// Program files directory for 32-bit installers.
///
/// `ProgramFiles(x86)` exists only on 64-bit Windows, where 32-bit tools
/// install; otherwise `ProgramFiles` is the right place.
fn program_files_32(env: &RenderEnvironment) -> String {
    env.var("ProgramFiles(x86)")
        .or_else(|| env.var("ProgramFiles"))
        .unwrap_or(WINDOWS_PROGRAM_FILES)
        .trim_end_matches('\\')
        .to_owned()
}
