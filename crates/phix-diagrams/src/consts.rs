//! Internal constants for diagram rendering.

/// Environment variable overriding every sequence diagram server URL.
pub const SEQUENCE_SERVER_ENV: &str = "PHIX_WEBSEQUENCEDIAGRAM_SERVER";

/// Default web sequence diagram API version.
pub const DEFAULT_API_VERSION: &str = "1";

/// Fallback program files directory on Windows.
pub const WINDOWS_PROGRAM_FILES: &str = r"C:\Program Files";

/// Placeholder prefix emitted during preprocessing.
pub const PLACEHOLDER_PREFIX: &str = "{{PHIX_DIAGRAM_";
