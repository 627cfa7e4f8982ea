//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid APP_PORT '{0}'")]
    Port(String),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// environment the host deploys the ExApp with. The result is validated.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("APP_ID") {
        config.app.id = v;
    }
    if let Some(v) = lookup("APP_DISPLAY_NAME") {
        config.app.display_name = v;
    }
    if let Some(v) = lookup("APP_VERSION") {
        config.app.version = v;
    }
    if let Some(v) = lookup("APP_SECRET") {
        config.app.secret = v;
    }
    if let Some(v) = lookup("NEXTCLOUD_URL") {
        config.host.nextcloud_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = lookup("AA_VERSION") {
        config.host.aa_version = v;
    }
    if let Some(v) = lookup("APP_PERSISTENT_STORAGE") {
        config.storage.persistent_dir = v;
    }

    let host = lookup("APP_HOST");
    let port = lookup("APP_PORT");
    if host.is_some() || port.is_some() {
        let (current_host, current_port) = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.to_string()))
            .unwrap_or_else(|| (config.listener.bind_address.clone(), String::new()));

        let host = host.unwrap_or(current_host);
        let port = match port {
            Some(p) => {
                p.parse::<u16>().map_err(|_| ConfigError::Port(p.clone()))?;
                p
            }
            None => current_port,
        };
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    Ok(())
}
