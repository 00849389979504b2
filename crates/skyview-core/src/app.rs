use std::sync::Arc;

use crate::config::ValidationResult;
use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Load and validate the configuration from the default location
    pub fn new() -> Result<Self, AppError> {
        let config = Config::load().map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;
        Self::with_config(config)
    }

    /// Create an application around an already loaded configuration.
    ///
    /// Validation errors are fatal; warnings are logged.
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();
        Self::report(&validation)?;

        tracing::info!("Configuration loaded from {}", config.config_dir.display());
        Ok(Self {
            config: Arc::new(config),
        })
    }

    fn report(validation: &ValidationResult) -> Result<(), ConfigError> {
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if validation.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(validation.error_summary()))
        }
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) {
        tracing::info!("Shutting down Skyview");
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_valid_config() {
        let app = App::with_config(Config::default()).unwrap();
        assert_eq!(app.config().ui.card_width, 36);
    }

    #[test]
    fn test_with_invalid_config() {
        let mut config = Config::default();
        config.ui.poll_interval_ms = 0;

        match App::with_config(config) {
            Err(AppError::Config(ConfigError::Invalid(summary))) => {
                assert!(summary.contains("ui.poll_interval_ms"));
            }
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("invalid config accepted"),
        }
    }
}
