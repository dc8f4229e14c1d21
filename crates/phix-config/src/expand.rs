//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` against the process environment.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` and `${VAR:-default}` using `lookup`.
///
/// Strings without `${` are returned unchanged, so a literal `$` in a URL
/// survives. An unset variable without a default is an error naming `field`.
pub(crate) fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| match lookup(name) {
        Some(found) => Ok(Some(found)),
        None => Err(Unset(name.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct Unset(String);

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "WSD_HOST" => Some("wsd.internal".to_owned()),
            "WSD_PORT" => Some("8080".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_embedded_vars() {
        let result = expand_with(
            "http://${WSD_HOST}:${WSD_PORT}/",
            "diagrams.sequence_server_url",
            lookup,
        )
        .unwrap();
        assert_eq!(result, "http://wsd.internal:8080/");
    }

    #[test]
    fn test_default_used_when_unset() {
        let result = expand_with("${WSD_STYLE:-napkin}", "diagrams.default_style", lookup).unwrap();
        assert_eq!(result, "napkin");
    }

    #[test]
    fn test_value_wins_over_default() {
        let result = expand_with("${WSD_HOST:-localhost}", "f", lookup).unwrap();
        assert_eq!(result, "wsd.internal");
    }

    #[test]
    fn test_unset_is_error_naming_field() {
        let err = expand_with("${WSD_TOKEN}", "diagrams.sequence_server_url", lookup).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(message.contains("WSD_TOKEN"));
        assert!(message.contains("diagrams.sequence_server_url"));
    }

    #[test]
    fn test_bare_dollar_left_alone() {
        let result = expand_with("https://example.com/$path", "f", lookup).unwrap();
        assert_eq!(result, "https://example.com/$path");
    }

    #[test]
    fn test_process_environment_lookup() {
        let result = expand_env("${PHIX_CONFIG_SURELY_UNSET_VAR:-fallback}", "f").unwrap();
        assert_eq!(result, "fallback");
    }
}
