//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_without_pattern_is_unchanged() {
        let result = expand_env("https://docs.example.com", "site.url").unwrap();
        assert_eq!(result, "https://docs.example.com");
    }

    #[test]
    fn test_expand_bare_dollar_is_unchanged() {
        let result = expand_env("$HOME/docs", "docs.edit_url").unwrap();
        assert_eq!(result, "$HOME/docs");
    }

    #[test]
    fn test_expand_var_inside_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCKET_TEST_ORG", "acme");
        }
        let result = expand_env("https://${DOCKET_TEST_ORG}.github.io", "site.url").unwrap();
        assert_eq!(result, "https://acme.github.io");
        unsafe {
            std::env::remove_var("DOCKET_TEST_ORG");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCKET_TEST_UNSET_BRANCH");
        }
        let result = expand_env(
            "https://github.com/acme/site/tree/${DOCKET_TEST_UNSET_BRANCH:-main}/",
            "docs.edit_url",
        )
        .unwrap();
        assert_eq!(result, "https://github.com/acme/site/tree/main/");
    }

    #[test]
    fn test_expand_missing_var_reports_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCKET_TEST_MISSING");
        }
        let err = expand_env("${DOCKET_TEST_MISSING}", "site.url").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("site.url"), "got: {msg}");
        assert!(msg.contains("DOCKET_TEST_MISSING"), "got: {msg}");
    }
}
