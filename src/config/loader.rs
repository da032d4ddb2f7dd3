//! Configuration loading from the process environment.
//!
//! Loaders take a lookup function instead of reading `std::env` directly so
//! the same code paths run in tests with a fixed environment.

use crate::config::schema::{LogFormat, ObservabilityConfig, PluginEnvironment};
use crate::config::validation::{validate_environment, ValidationError};

pub const MAGIC_COOKIE_KEY: &str = "TF_PLUGIN_MAGIC_COOKIE";
pub const PROTOCOL_VERSIONS_KEY: &str = "PLUGIN_PROTOCOL_VERSIONS";
pub const MIN_PORT_KEY: &str = "PLUGIN_MIN_PORT";
pub const MAX_PORT_KEY: &str = "PLUGIN_MAX_PORT";
pub const LOG_PROVIDER_KEY: &str = "TF_LOG_PROVIDER";
pub const LOG_KEY: &str = "TF_LOG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Parse {
        key: &'static str,
        value: String,
        reason: String,
    },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse { key, value, reason } => {
                write!(f, "Invalid {}={:?}: {}", key, value, reason)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a variable from the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Load and validate the handshake parameters set by the orchestrator.
pub fn load_plugin_environment<F>(lookup: F) -> Result<PluginEnvironment, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = PluginEnvironment {
        magic_cookie: lookup(MAGIC_COOKIE_KEY),
        protocol_versions: parse_versions(lookup(PROTOCOL_VERSIONS_KEY))?,
        min_port: parse_port(MIN_PORT_KEY, lookup(MIN_PORT_KEY))?,
        max_port: parse_port(MAX_PORT_KEY, lookup(MAX_PORT_KEY))?,
    };

    validate_environment(&env).map_err(ConfigError::Validation)?;

    Ok(env)
}

/// Resolve logging settings. `TF_LOG_PROVIDER` wins over `TF_LOG`.
///
/// Unrecognised non-empty levels enable trace output, `JSON` enables trace
/// output in JSON form.
pub fn load_observability<F>(lookup: F) -> ObservabilityConfig
where
    F: Fn(&str) -> Option<String>,
{
    let level = lookup(LOG_PROVIDER_KEY)
        .filter(|v| !v.trim().is_empty())
        .or_else(|| lookup(LOG_KEY).filter(|v| !v.trim().is_empty()));

    let Some(level) = level else {
        return ObservabilityConfig::default();
    };

    let level = level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => ObservabilityConfig {
            log_level: level,
            log_format: LogFormat::Text,
        },
        "json" => ObservabilityConfig {
            log_level: "trace".to_string(),
            log_format: LogFormat::Json,
        },
        _ => ObservabilityConfig {
            log_level: "trace".to_string(),
            log_format: LogFormat::Text,
        },
    }
}

fn parse_versions(raw: Option<String>) -> Result<Vec<u32>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>().map_err(|e| ConfigError::Parse {
                key: PROTOCOL_VERSIONS_KEY,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_port(key: &'static str, raw: Option<String>) -> Result<Option<u16>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                key,
                value,
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_loads() {
        let env = load_plugin_environment(lookup(&[])).unwrap();
        assert_eq!(env, PluginEnvironment::default());
    }

    #[test]
    fn loads_handshake_variables() {
        let env = load_plugin_environment(lookup(&[
            (MAGIC_COOKIE_KEY, "cookie"),
            (PROTOCOL_VERSIONS_KEY, "5, 6"),
            (MIN_PORT_KEY, "10000"),
            (MAX_PORT_KEY, "25000"),
        ]))
        .unwrap();

        assert_eq!(env.magic_cookie.as_deref(), Some("cookie"));
        assert_eq!(env.protocol_versions, vec![5, 6]);
        assert_eq!(env.min_port, Some(10000));
        assert_eq!(env.max_port, Some(25000));
    }

    #[test]
    fn rejects_malformed_port() {
        let err = load_plugin_environment(lookup(&[(MIN_PORT_KEY, "abc"), (MAX_PORT_KEY, "10")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { key: MIN_PORT_KEY, .. }));
        assert!(err.to_string().contains("PLUGIN_MIN_PORT"));
    }

    #[test]
    fn rejects_malformed_versions() {
        let err = load_plugin_environment(lookup(&[(PROTOCOL_VERSIONS_KEY, "6,x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { key: PROTOCOL_VERSIONS_KEY, .. }));
    }

    #[test]
    fn surfaces_validation_errors() {
        let err = load_plugin_environment(lookup(&[(MAX_PORT_KEY, "10")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: "));
    }

    #[test]
    fn provider_log_level_wins() {
        let config = load_observability(lookup(&[(LOG_PROVIDER_KEY, "DEBUG"), (LOG_KEY, "ERROR")]));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Text);

        let config = load_observability(lookup(&[(LOG_KEY, "Info")]));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn json_and_unknown_levels_trace() {
        let config = load_observability(lookup(&[(LOG_KEY, "JSON")]));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_format, LogFormat::Json);

        let config = load_observability(lookup(&[(LOG_KEY, "verbose")]));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn unset_logging_defaults() {
        assert_eq!(load_observability(lookup(&[])), ObservabilityConfig::default());
        assert_eq!(
            load_observability(lookup(&[(LOG_KEY, "  ")])),
            ObservabilityConfig::default()
        );
    }
}
