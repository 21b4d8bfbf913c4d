//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::config::schema::{LogFormat, RelayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Comma-separated destination list.
pub const ENV_SITES: &str = "FORWARDHOOK_SITES";
pub const ENV_BIND: &str = "FORWARDHOOK_BIND";
pub const ENV_MAX_RETRIES: &str = "FORWARDHOOK_MAX_RETRIES";
pub const ENV_BACKOFF_SECS: &str = "FORWARDHOOK_BACKOFF_SECS";
/// Setting a key also turns full-text mode on.
pub const ENV_FULLTEXT_API_KEY: &str = "FORWARDHOOK_FULLTEXT_API_KEY";
pub const ENV_FULLTEXT_API_URL: &str = "FORWARDHOOK_FULLTEXT_API_URL";
pub const ENV_LOG_FORMAT: &str = "FORWARDHOOK_LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Read a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Split a comma-separated site list, dropping blanks.
pub fn parse_sites(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_env<T: FromStr>(
    name: &'static str,
    value: String,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(ValidationError::InvalidEnv { name, value });
            None
        }
    }
}

/// Overlay environment variables onto `config`.
///
/// `lookup` resolves a variable name; pass `|k| std::env::var(k).ok()` in production.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), Vec<ValidationError>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();

    if let Some(sites) = lookup(ENV_SITES) {
        config.destinations = parse_sites(&sites);
    }
    if let Some(bind) = lookup(ENV_BIND) {
        config.listener.bind_address = bind.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_MAX_RETRIES) {
        if let Some(n) = parse_env(ENV_MAX_RETRIES, raw, &mut errors) {
            config.retries.max_attempts = n;
        }
    }
    if let Some(raw) = lookup(ENV_BACKOFF_SECS) {
        if let Some(n) = parse_env(ENV_BACKOFF_SECS, raw, &mut errors) {
            config.retries.backoff_secs = n;
        }
    }
    if let Some(key) = lookup(ENV_FULLTEXT_API_KEY) {
        config.fulltext.api_key = key.trim().to_string();
        config.fulltext.enabled = true;
    }
    if let Some(url) = lookup(ENV_FULLTEXT_API_URL) {
        config.fulltext.api_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_LOG_FORMAT) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => config.observability.log_format = LogFormat::Json,
            "pretty" => config.observability.log_format = LogFormat::Pretty,
            _ => errors.push(ValidationError::InvalidEnv { name: ENV_LOG_FORMAT, value: raw }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the effective configuration: optional file, then environment, then validation.
pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => read_config(p)?,
        None => RelayConfig::default(),
    };

    let mut errors = apply_env_overrides(&mut config, lookup).err().unwrap_or_default();
    if let Err(more) = validate_config(&config) {
        errors.extend(more);
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_parse_sites() {
        assert_eq!(
            parse_sites("https://a.test/hook, https://b.test/hook,,"),
            vec!["https://a.test/hook", "https://b.test/hook"]
        );
        assert!(parse_sites("").is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_SITES, "https://a.test/hook,https://b.test/hook"),
                (ENV_BIND, "127.0.0.1:9001"),
                (ENV_MAX_RETRIES, "4"),
                (ENV_BACKOFF_SECS, "2"),
                (ENV_FULLTEXT_API_KEY, "secret"),
                (ENV_LOG_FORMAT, "JSON"),
            ]),
        )
        .unwrap();

        assert_eq!(config.destinations.len(), 2);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9001");
        assert_eq!(config.retries.max_attempts, 4);
        assert_eq!(config.retries.backoff_secs, 2);
        assert!(config.fulltext.enabled);
        assert_eq!(config.fulltext.api_key, "secret");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_env_values_are_reported() {
        let mut config = RelayConfig::default();
        let errors = apply_env_overrides(
            &mut config,
            env(&[(ENV_MAX_RETRIES, "ten"), (ENV_LOG_FORMAT, "xml")]),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(config.retries.max_attempts, 10);
    }

    #[test]
    fn test_load_without_sites_fails() {
        let err = load(None, env(&[])).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::NoDestinations]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let path = std::env::temp_dir().join(format!("forwardhook-test-{}.toml", std::process::id()));
        fs::write(
            &path,
            "destinations = [\"https://file.test/hook\"]\n[retries]\nbackoff_secs = 3\n",
        )
        .unwrap();

        let config = load(Some(&path), env(&[(ENV_SITES, "https://env.test/hook")])).unwrap();
        assert_eq!(config.destinations, vec!["https://env.test/hook"]);
        assert_eq!(config.retries.backoff_secs, 3);

        let from_file = load_config(&path).unwrap();
        assert_eq!(from_file.destinations, vec!["https://file.test/hook"]);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/forwardhook.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
