pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{Config, LocationConfig, UiConfig, WeatherConfig, API_KEY_ENV};
pub use error::{AppError, ConfigError, LocationError, NetworkError, WeatherError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr; stdout belongs to the cards
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Skyview core initialized");
    Ok(())
}
