//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Only the braced form is expanded, so a literal `$` in a URL or path
/// survives untouched. `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand an optional value in place.
pub(crate) fn expand_env_opt(
    value: &mut Option<String>,
    field: &str,
) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_returned_as_is() {
        assert_eq!(expand_env("pages", "docs.source_dir").unwrap(), "pages");
    }

    #[test]
    fn test_bare_dollar_is_not_expanded() {
        assert_eq!(
            expand_env("/public/$logo.svg", "site.logo").unwrap(),
            "/public/$logo.svg"
        );
    }

    #[test]
    fn test_set_variable_is_substituted() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("GB_EXPAND_TRACKING", "UA-1-1");
        }
        let result = expand_env("${GB_EXPAND_TRACKING}", "analytics.tracking_id").unwrap();
        assert_eq!(result, "UA-1-1");
        unsafe {
            std::env::remove_var("GB_EXPAND_TRACKING");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("GB_EXPAND_UNSET_HOST");
        }
        let result = expand_env("${GB_EXPAND_UNSET_HOST:-0.0.0.0}", "server.host").unwrap();
        assert_eq!(result, "0.0.0.0");
    }

    #[test]
    fn test_unset_without_default_names_field_and_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("GB_EXPAND_MISSING");
        }
        let err = expand_env("id-${GB_EXPAND_MISSING}", "analytics.tracking_id").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("GB_EXPAND_MISSING"));
        assert!(msg.contains("analytics.tracking_id"));
    }

    #[test]
    fn test_expand_opt_leaves_none_alone() {
        let mut value = None;
        expand_env_opt(&mut value, "site.logo").unwrap();
        assert!(value.is_none());
    }
}
