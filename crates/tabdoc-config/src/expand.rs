//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` references in `value`.
///
/// `${VAR}` fails with [`ConfigError::EnvVar`] naming `field` when the
/// variable is unset; `${VAR:-default}` falls back to `default`. Strings
/// without `${` are returned as-is, so a bare `$` is never interpreted.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Unset> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| Unset(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand an optional value, mapping an empty expansion to `None`.
///
/// Used for secrets such as `search.api_key = "${MEILISEARCH_KEY:-}"`, where
/// an unset variable means "no key".
pub(crate) fn expand_optional(
    value: Option<&str>,
    field: &str,
) -> Result<Option<String>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let expanded = expand_env(value, field)?;
    Ok((!expanded.is_empty()).then_some(expanded))
}

/// Name of the variable whose lookup failed.
struct Unset(String);
