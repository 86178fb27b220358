//! Configuration management for the `EnergyMatch` service
//!
//! Handles loading configuration from an optional TOML file and
//! environment variables, and validates every setting before the
//! server starts.

use crate::EnergyMatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Legacy variable holding the lead webhook URL. Wins over every other source.
pub const WEBHOOK_URL_ENV: &str = "N8N_WEBHOOK_URL";

/// Root configuration structure for the `EnergyMatch` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Lead webhook settings
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for handling a single request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum accepted upload size for bill files, in MB
    #[serde(default = "default_max_upload")]
    pub max_upload_mb: u32,
}

/// Outbound lead webhook settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Target URL. Forwarding is disabled when absent or blank.
    #[serde(default)]
    pub url: Option<String>,
    /// Timeout for the single delivery attempt, in seconds
    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_upload() -> u32 {
    10
}

fn default_webhook_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_upload_mb: default_max_upload(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: default_webhook_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Upload limit in bytes
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

impl WebhookConfig {
    /// Configuration with forwarding enabled towards `url`
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// The trimmed webhook URL, or `None` when forwarding is disabled
    #[must_use]
    pub fn enabled_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. ENERGYMATCH_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("ENERGYMATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("webhook.url", std::env::var(WEBHOOK_URL_ENV).ok())
            .with_context(|| format!("Failed to apply {WEBHOOK_URL_ENV}"))?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        Self::finish(settings)
    }

    /// Load configuration from an in-memory TOML document, without file or
    /// environment sources
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .with_context(|| "Failed to build configuration")?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self> {
        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.max_upload_mb == 0 {
            self.server.max_upload_mb = default_max_upload();
        }
        if self.webhook.timeout_seconds == 0 {
            self.webhook.timeout_seconds = default_webhook_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_webhook()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.request_timeout_seconds > 300 {
            return Err(EnergyMatchError::config(
                "Request timeout cannot exceed 300 seconds",
            )
            .into());
        }

        if self.server.max_upload_mb > 100 {
            return Err(EnergyMatchError::config("Upload limit cannot exceed 100 MB").into());
        }

        if !(1..=60).contains(&self.webhook.timeout_seconds) {
            return Err(EnergyMatchError::config(
                "Webhook timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        // a hanging webhook must not turn an acknowledged lead into a 408
        if self.webhook.timeout_seconds >= self.server.request_timeout_seconds {
            return Err(EnergyMatchError::config(format!(
                "Webhook timeout ({}s) must be shorter than the request timeout ({}s)",
                self.webhook.timeout_seconds, self.server.request_timeout_seconds
            ))
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(EnergyMatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(EnergyMatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_webhook(&self) -> Result<()> {
        if let Some(url) = self.webhook.enabled_url() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(EnergyMatchError::config(
                    "Webhook URL must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.webhook.timeout_seconds, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.webhook.url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.webhook.timeout(), Duration::from_secs(5));
        assert_eq!(config.server.max_upload_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_toml_sections_are_read() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 9100

            [webhook]
            url = "https://hooks.example.com/lead"
            timeout_seconds = 2

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(
            config.webhook.enabled_url(),
            Some("https://hooks.example.com/lead")
        );
        assert_eq!(config.webhook.timeout_seconds, 2);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_blank_webhook_url_disables_forwarding() {
        let mut webhook = WebhookConfig::with_url("   ");
        assert_eq!(webhook.enabled_url(), None);

        webhook.url = None;
        assert_eq!(webhook.enabled_url(), None);
    }

    #[test]
    fn test_webhook_url_is_trimmed() {
        let webhook = WebhookConfig::with_url(" http://localhost:5678/webhook ");
        assert_eq!(webhook.enabled_url(), Some("http://localhost:5678/webhook"));
    }

    #[test]
    fn test_config_validation_invalid_webhook_scheme() {
        let mut config = AppConfig::default();
        config.webhook = WebhookConfig::with_url("ftp://example.com/hook");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AppConfig::default();
        config.webhook.timeout_seconds = 120;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Webhook timeout"));

        let mut config = AppConfig::default();
        config.server.request_timeout_seconds = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_webhook_timeout_must_fit_inside_request_timeout() {
        let result = AppConfig::from_toml_str(
            r#"
            [server]
            request_timeout_seconds = 1

            [webhook]
            timeout_seconds = 3
            "#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("shorter than the request timeout"));

        let mut config = AppConfig::default();
        config.server.request_timeout_seconds = 5;
        config.webhook.timeout_seconds = 5;
        assert!(config.validate().is_err());

        config.webhook.timeout_seconds = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [webhook]
            timeout_seconds = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.webhook.timeout_seconds, 5);
    }

    #[test]
    fn test_invalid_document_is_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [logging]
            format = "xml"
            "#,
        );
        assert!(result.is_err());
    }
}
