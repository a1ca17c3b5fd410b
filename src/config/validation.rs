//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured before startup.

use crate::utils::errors::{Result, TourneyHubError};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_email_config(&settings.email)?;
    validate_reminders_config(&settings.reminders)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(TourneyHubError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(TourneyHubError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TourneyHubError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(TourneyHubError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(TourneyHubError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate email provider configuration
fn validate_email_config(config: &super::EmailConfig) -> Result<()> {
    if config.api_key.is_empty() {
        return Err(TourneyHubError::Config(
            "Email provider API key is required".to_string()
        ));
    }

    if config.from_address.is_empty() {
        return Err(TourneyHubError::Config(
            "Email from-address is required".to_string()
        ));
    }

    url::Url::parse(&config.api_url).map_err(|e| {
        TourneyHubError::Config(format!("Invalid email provider API URL: {e}"))
    })?;

    if config.timeout_seconds == 0 {
        return Err(TourneyHubError::Config(
            "Email provider timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate reminder job configuration
fn validate_reminders_config(config: &super::RemindersConfig) -> Result<()> {
    if config.days_ahead <= 0 {
        return Err(TourneyHubError::Config(
            "Reminder days_ahead must be greater than 0".to_string()
        ));
    }

    if config.max_concurrent_sends == 0 {
        return Err(TourneyHubError::Config(
            "Reminder max_concurrent_sends must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TourneyHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TourneyHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_need_api_key() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_settings_with_api_key_are_valid() {
        let mut settings = Settings::default();
        settings.email.api_key = "re_test_key".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let mut settings = Settings::default();
        settings.email.api_key = "re_test_key".to_string();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut settings = Settings::default();
        settings.email.api_key = "re_test_key".to_string();
        settings.reminders.max_concurrent_sends = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
