//! Environment-variable lookups with structured errors.
use std::{env, str::FromStr};

use thiserror::Error;

/// Errors raised while reading settings from the process environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// The variable is set but its value is not valid unicode.
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),

    /// The variable is set but could not be parsed into the requested type.
    #[error("Environment variable {name} has invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Raw value as found in the environment.
        value: String,
        /// Parser error message.
        reason: String,
    },
}

/// Reads an optional environment variable, returning `Ok(None)` when unset or blank.
pub fn get_env_var_opt(name: &str) -> Result<Option<String>, EnvError> {
    match env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(name.to_string())),
    }
}

/// Reads an optional environment variable and parses it with [`FromStr`].
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get_env_var_opt(name)? else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| EnvError::Invalid {
            name: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_var_reads_as_none() {
        assert_eq!(get_env_var_opt("SHARED_UTILS_TEST_SURELY_UNSET").unwrap(), None);
    }

    #[test]
    fn blank_var_reads_as_unset() {
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var("SHARED_UTILS_TEST_BLANK", "   ") };
        assert_eq!(get_env_var_opt("SHARED_UTILS_TEST_BLANK").unwrap(), None);
        assert_eq!(parse_env_var::<u32>("SHARED_UTILS_TEST_BLANK").unwrap(), None);
    }

    #[test]
    fn parses_typed_values() {
        // SAFETY: the variable names are unique to this test.
        unsafe {
            env::set_var("SHARED_UTILS_TEST_NUM", " 42 ");
            env::set_var("SHARED_UTILS_TEST_BAD", "forty-two");
        }
        assert_eq!(parse_env_var::<u32>("SHARED_UTILS_TEST_NUM").unwrap(), Some(42));
        assert_eq!(parse_env_var::<u32>("SHARED_UTILS_TEST_UNSET_NUM").unwrap(), None);

        let err = parse_env_var::<u32>("SHARED_UTILS_TEST_BAD").unwrap_err();
        assert!(matches!(err, EnvError::Invalid { ref value, .. } if value == "forty-two"));
    }
}
