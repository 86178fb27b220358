//! Error types and handling for the `EnergyMatch` service

use thiserror::Error;

/// Main error type for the `EnergyMatch` service
#[derive(Error, Debug)]
pub enum EnergyMatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failures talking to an external system (webhook, upstream API)
    #[error("Upstream error: {message}")]
    Upstream { message: String },
}

impl EnergyMatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            EnergyMatchError::Config { message } => format!(
                "Configuration error: {message}. Please check config.toml and the ENERGYMATCH_* variables."
            ),
            EnergyMatchError::Upstream { .. } => {
                "Unable to reach an external service.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = EnergyMatchError::config("bad port");
        assert!(matches!(config_err, EnergyMatchError::Config { .. }));

        let upstream_err = EnergyMatchError::upstream("connection refused");
        assert!(matches!(upstream_err, EnergyMatchError::Upstream { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = EnergyMatchError::config("Invalid log level 'loud'");
        let message = config_err.user_message();
        assert!(message.contains("Invalid log level 'loud'"));
        assert!(message.contains("config.toml"));

        let upstream_err = EnergyMatchError::upstream("test");
        assert!(upstream_err.user_message().contains("Unable to reach"));
    }

    #[test]
    fn test_display_includes_message() {
        let err = EnergyMatchError::upstream("webhook answered 500");
        assert_eq!(err.to_string(), "Upstream error: webhook answered 500");
    }

    #[test]
    fn test_config_error_survives_anyhow_context() {
        let err = anyhow::Error::from(EnergyMatchError::config("port taken"))
            .context("Failed to load configuration");
        let inner = err.downcast_ref::<EnergyMatchError>().unwrap();
        assert!(inner.user_message().contains("port taken"));
    }
}
