//! Wiring between the loaded configuration and the models: builds the
//! provider, the locator and the runtime handle every model shares.

use std::sync::Arc;
use std::time::Duration;

use skyview_core::{AppError, Config, LocationConfig};
use skyview_weather::{Coordinates, Locator, WeatherProvider};
use tokio::runtime::Handle;

use crate::services::{LocationError, WeatherError};

/// Shared services handed to every model
#[derive(Debug, Clone)]
pub struct WeatherServices {
    pub provider: Arc<WeatherProvider>,
    pub locator: Arc<Locator>,
    pub runtime: Handle,
    /// Cosmetic pause between the position being granted and the reveal
    pub reveal_delay: Duration,
}

impl WeatherServices {
    pub fn new(
        provider: WeatherProvider,
        locator: Locator,
        runtime: Handle,
        reveal_delay: Duration,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            locator: Arc::new(locator),
            runtime,
            reveal_delay,
        }
    }

    /// Build the services described by `config`
    pub fn from_config(config: &Config, runtime: Handle) -> Result<Self, AppError> {
        let api_key = config.api_key().unwrap_or_else(|| {
            tracing::warn!("No weather API key configured; lookups will fail");
            String::new()
        });

        let provider = WeatherProvider::new(
            config.weather.base_url.clone(),
            api_key,
            config.weather.request_timeout(),
        )
        .map_err(WeatherError::from)?;

        let locator = build_locator(&config.location, config.weather.request_timeout())
            .map_err(LocationError::from)?;

        tracing::info!("Weather services initialized ({})", provider.base_url());
        Ok(Self::new(
            provider,
            locator,
            runtime,
            config.ui.reveal_delay(),
        ))
    }
}

fn build_locator(
    config: &LocationConfig,
    timeout: Duration,
) -> Result<Locator, skyview_weather::LocationError> {
    if !config.enabled {
        tracing::info!("Location access disabled by configuration");
        return Ok(Locator::denied());
    }

    match config.fixed_coordinates() {
        Some((latitude, longitude)) => {
            tracing::info!("Using configured location {}, {}", latitude, longitude);
            Ok(Locator::fixed(Coordinates::new(latitude, longitude)))
        }
        None => Locator::ip_lookup(config.lookup_url.clone(), timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_location_builds_denied_locator() {
        let mut config = Config::default();
        config.location.enabled = false;

        let services = WeatherServices::from_config(&config, Handle::current()).unwrap();

        assert!(matches!(
            services.locator.current_position().await,
            Err(skyview_weather::LocationError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn fixed_coordinates_win_over_lookup() {
        let mut config = Config::default();
        config.location.latitude = Some(51.5);
        config.location.longitude = Some(-0.12);
        config.location.lookup_url = "http://127.0.0.1:9/json".into();

        let services = WeatherServices::from_config(&config, Handle::current()).unwrap();
        let position = services.locator.current_position().await.unwrap();

        assert_eq!(position.coordinates, Coordinates::new(51.5, -0.12));
        assert_eq!(services.reveal_delay, Duration::from_secs(3));
    }
}
