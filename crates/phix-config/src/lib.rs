//! Configuration management for Phix.
//!
//! Parses `phix.toml` with serde and discovers it in the current directory or
//! its parents. CLI settings override file values via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` (error if unset) and `${VAR:-default}`.
//!
//! Expanded fields:
//! - `build.source_dir`
//! - `build.output_dir`
//! - `diagrams.sequence_server_url`
//! - `diagrams.default_style`
//!
//! ## Example
//!
//! ```toml
//! [build]
//! source_dir = "docs"
//! output_dir = "site"
//! format = "html"
//!
//! [diagrams]
//! sequence_server_url = "${WSD_SERVER:-http://www.websequencediagrams.com/}"
//! default_style = "napkin"
//! ```

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "phix.toml";

/// Default directory for rendered diagrams, relative to the output root.
pub const DEFAULT_IMAGE_DIR: &str = "_images";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the output format.
    pub format: Option<OutputFormat>,
    /// Override the sequence diagram server.
    pub sequence_server_url: Option<String>,
}

/// Kind of document being produced.
///
/// HTML output keeps diagrams in an image directory referenced from each page;
/// print output writes them next to the document at the output root.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Print,
}

/// Application configuration.
#[derive(Debug, Default)]
pub struct Config {
    /// Resolved build settings.
    pub build: BuildConfig,
    /// Diagram rendering settings.
    pub diagrams: DiagramsConfig,
    /// Path to the config file, if one was loaded.
    pub config_path: Option<PathBuf>,
}

/// Raw file contents before path resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    build: BuildConfigRaw,
    diagrams: DiagramsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    format: Option<OutputFormat>,
    image_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory containing markdown sources.
    pub source_dir: PathBuf,
    /// Directory receiving HTML pages and rendered diagrams.
    pub output_dir: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Image directory name under the output root (HTML only).
    pub image_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

impl BuildConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            source_dir: base.join("docs"),
            output_dir: base.join("site"),
            format: OutputFormat::Html,
            image_dir: DEFAULT_IMAGE_DIR.to_owned(),
        }
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramsConfig {
    /// Default web sequence diagram server.
    pub sequence_server_url: Option<String>,
    /// Default web sequence diagram style.
    pub default_style: String,
    /// Default web sequence diagram API version.
    pub api_version: String,
    /// Global HTTP timeout in seconds. Unset means no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            sequence_server_url: None,
            default_style: "vs2010".to_owned(),
            api_version: "1".to_owned(),
            timeout_secs: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `diagrams.sequence_server_url`).
        field: String,
        /// Error message (e.g. `${WSD_SERVER} not set`).
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// With `config_path`, that file must exist. Otherwise `phix.toml` is
    /// searched in the current directory and its parents; without one, defaults
    /// relative to the current directory are used.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit file is missing, parsing or expansion
    /// fails, or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            let cwd = std::env::current_dir()?;
            Self {
                build: BuildConfig::with_base(&cwd),
                ..Self::default()
            }
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut file: ConfigFile = toml::from_str(content)?;
        file.expand_env_vars()?;

        let defaults = BuildConfig::with_base(base_dir);
        let resolve = |raw: Option<String>, default: PathBuf| {
            raw.map_or(default, |dir| base_dir.join(dir))
        };

        let config = Self {
            build: BuildConfig {
                source_dir: resolve(file.build.source_dir, defaults.source_dir),
                output_dir: resolve(file.build.output_dir, defaults.output_dir),
                format: file.build.format.unwrap_or_default(),
                image_dir: file.build.image_dir.unwrap_or(defaults.image_dir),
            },
            diagrams: file.diagrams,
            config_path: None,
        };
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.build.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build.output_dir.clone_from(output_dir);
        }
        if let Some(format) = settings.format {
            self.build.format = format;
        }
        if let Some(url) = &settings.sequence_server_url {
            self.diagrams.sequence_server_url = Some(url.clone());
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let image_dir = &self.build.image_dir;
        require_non_empty(image_dir, "build.image_dir")?;
        if image_dir.starts_with('/') || image_dir.split('/').any(|seg| seg == "..") {
            return Err(ConfigError::Validation(
                "build.image_dir must stay inside the output directory".to_owned(),
            ));
        }

        if let Some(url) = &self.diagrams.sequence_server_url {
            require_non_empty(url, "diagrams.sequence_server_url")?;
            require_http_url(url, "diagrams.sequence_server_url")?;
        }
        require_non_empty(&self.diagrams.default_style, "diagrams.default_style")?;
        require_non_empty(&self.diagrams.api_version, "diagrams.api_version")?;
        if self.diagrams.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }
}

impl ConfigFile {
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
            if let Some(raw) = value.as_deref() {
                *value = Some(expand::expand_env(raw, field)?);
            }
            Ok(())
        }

        expand_opt(&mut self.build.source_dir, "build.source_dir")?;
        expand_opt(&mut self.build.output_dir, "build.output_dir")?;
        expand_opt(
            &mut self.diagrams.sequence_server_url,
            "diagrams.sequence_server_url",
        )?;
        self.diagrams.default_style =
            expand::expand_env(&self.diagrams.default_style, "diagrams.default_style")?;
        Ok(())
    }
}
