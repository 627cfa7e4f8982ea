//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work. All errors are collected, not just the first.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app.id.trim().is_empty() {
        errors.push(ValidationError::new("app.id", "must not be empty"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.backend.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "backend.address",
            format!("'{}' is not a socket address", config.backend.address),
        ));
    }

    if url::Url::parse(&config.host.nextcloud_url).is_err() {
        errors.push(ValidationError::new(
            "host.nextcloud_url",
            format!("'{}' is not a URL", config.host.nextcloud_url),
        ));
    }

    if config.frontend.index_file.is_empty() {
        errors.push(ValidationError::new("frontend.index_file", "must not be empty"));
    }

    if config
        .localization
        .default_language
        .parse::<unic_langid::LanguageIdentifier>()
        .is_err()
    {
        errors.push(ValidationError::new(
            "localization.default_language",
            format!("'{}' is not a language tag", config.localization.default_language),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be > 0"));
    }

    for model in &config.models {
        if url::Url::parse(&model.url).is_err() {
            errors.push(ValidationError::new(
                "models.url",
                format!("'{}' is not a URL", model.url),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.app.id = " ".into();
        config.backend.address = "nowhere".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["app.id", "backend.address", "timeouts.request_secs"]);
    }

    #[test]
    fn default_language_must_be_a_tag() {
        let mut config = AppConfig::default();
        config.localization.default_language = "not a tag".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "localization.default_language");
    }
}
