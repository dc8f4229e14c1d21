//! Snapshot of the process environment taken once per build.

use std::collections::HashMap;

/// Host platform, as far as default tool locations are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Other,
}

impl Platform {
    /// Platform of the running process.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// Environment variables and platform seen by the render pipeline.
///
/// Launch overrides, the sequence server override and post-process
/// templates are all resolved against this snapshot rather than the live
/// environment, so a build sees one consistent view.
#[derive(Debug, Clone)]
pub struct RenderEnvironment {
    vars: HashMap<String, String>,
    platform: Platform,
}

impl RenderEnvironment {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            vars,
            platform: Platform::current(),
        }
    }

    /// Build an environment from explicit variables.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I, platform: Platform) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            platform,
        }
    }

    /// Return a copy with one variable set.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Value of a variable, if set.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_lookup() {
        let env = RenderEnvironment::from_vars([("DIA_LAUNCH", "dia --nosplash")], Platform::Other);

        assert_eq!(env.var("DIA_LAUNCH"), Some("dia --nosplash"));
        assert_eq!(env.var("INKSCAPE_LAUNCH"), None);
        assert_eq!(env.platform(), Platform::Other);
    }

    #[test]
    fn test_with_var_overrides() {
        let env = RenderEnvironment::from_vars([("A", "1")], Platform::Windows).with_var("A", "2");
        assert_eq!(env.var("A"), Some("2"));
    }

    #[test]
    fn test_capture_sees_path() {
        let env = RenderEnvironment::capture();
        assert_eq!(env.platform(), Platform::current());
        assert_eq!(env.var("PATH").is_some(), std::env::var("PATH").is_ok());
    }
}
