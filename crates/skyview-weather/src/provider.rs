//! OpenWeatherMap "current weather" client.
//!
//! Only `cod: "404"` is treated as a provider-level answer; every other
//! unusable body surfaces as a parse error.

use crate::types::{Coordinates, Lookup, WeatherError, WeatherView};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const UNITS: &str = "metric";
const NOT_FOUND_CODE: &str = "404";

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    /// Number on success, string on errors
    #[serde(default)]
    cod: Option<serde_json::Value>,
    main: Option<MainReadings>,
    wind: Option<WindReadings>,
    name: Option<String>,
    #[serde(default)]
    weather: Vec<ConditionEntry>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    humidity: f64,
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct WindReadings {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
}

impl CurrentResponse {
    fn is_not_found(&self) -> bool {
        matches!(&self.cod, Some(serde_json::Value::String(code)) if code == NOT_FOUND_CODE)
    }

    fn into_lookup(self) -> Result<Lookup, WeatherError> {
        if self.is_not_found() {
            return Ok(Lookup::NotFound);
        }

        let main = self
            .main
            .ok_or_else(|| WeatherError::Parse("response has no `main` readings".into()))?;
        let wind = self
            .wind
            .ok_or_else(|| WeatherError::Parse("response has no `wind` readings".into()))?;
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response has no `weather` entries".into()))?;

        Ok(Lookup::Found(WeatherView::from_readings(
            main.humidity,
            wind.speed,
            main.temp,
            self.name.unwrap_or_default(),
            condition.main,
        )))
    }
}

/// Parse a raw response body into a lookup outcome
pub fn parse_current(body: &[u8]) -> Result<Lookup, WeatherError> {
    let response: CurrentResponse =
        serde_json::from_slice(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    response.into_lookup()
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: Arc<str>,
}

impl WeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: Arc::from(api_key.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current weather at the given coordinates
    pub async fn current_at(&self, coordinates: Coordinates) -> Result<Lookup, WeatherError> {
        let params = [
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
        ];
        tracing::debug!(
            "Fetching weather for {}, {}",
            coordinates.latitude,
            coordinates.longitude
        );
        self.fetch(&params).await
    }

    /// Current weather for a free-text city name. The caller trims.
    pub async fn current_in(&self, city: &str) -> Result<Lookup, WeatherError> {
        tracing::debug!("Fetching weather for city {:?}", city);
        self.fetch(&[("q", city.to_string())]).await
    }

    async fn fetch(&self, params: &[(&str, String)]) -> Result<Lookup, WeatherError> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        // The HTTP status is ignored; the body's `cod` decides
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("units", UNITS), ("appid", &*self.api_key)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let lookup = parse_current(&body);

        match &lookup {
            Ok(Lookup::Found(view)) => tracing::info!(
                "Weather for {}: {}°C {}",
                view.place_name,
                view.temperature,
                view.condition
            ),
            Ok(Lookup::NotFound) => tracing::info!("Provider has no match (HTTP {})", status),
            Err(e) => tracing::warn!("Unusable provider response (HTTP {}): {}", status, e),
        }

        lookup
    }
}
