use serde::{Deserialize, Serialize};

/// Place name shown before anything has been looked up
pub const PLACEHOLDER_PLACE: &str = "Enter Location";

/// Place name shown when the provider answers "404"
pub const INVALID_CITY: &str = "Invalid City";

/// Glyph shown next to the temperature, picked from the condition label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Sunny,
    Haze,
    Clouds,
    Rain,
    Snow,
    Dust,
    Fog,
    Drizzle,
    #[default]
    Invalid,
}

impl Glyph {
    /// Resolve a provider condition label (`weather[0].main`).
    /// Unknown labels fall back to `Invalid`, never fail.
    ///
    /// Both panels draw from this one table. `Mist` shares the `Fog` glyph
    /// and `Drizzle` has a glyph of its own.
    pub fn for_condition(label: &str) -> Self {
        match label {
            "Clear" => Self::Sunny,
            "Haze" => Self::Haze,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Dust" => Self::Dust,
            "Fog" | "Mist" => Self::Fog,
            "Drizzle" => Self::Drizzle,
            _ => Self::Invalid,
        }
    }

    /// Stable name, useful for logs and theming
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Haze => "haze",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Dust => "dust",
            Self::Fog => "fog",
            Self::Drizzle => "drizzle",
            Self::Invalid => "invalid",
        }
    }

    /// Single-column symbol drawn on the terminal cards
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Sunny => "☀",
            Self::Haze => "◐",
            Self::Clouds => "☁",
            Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Dust => "∴",
            Self::Fog => "≡",
            Self::Drizzle => "⁘",
            Self::Invalid => "?",
        }
    }
}

/// Normalized display record for one panel.
///
/// Always replaced as a whole, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherView {
    /// Relative humidity in percent
    pub humidity: i32,
    /// Wind speed in m/s (metric units)
    pub wind: i32,
    /// Temperature in °C
    pub temperature: i32,
    pub place_name: String,
    /// Short condition category such as "Clear" or "Rain"
    pub condition: String,
    pub glyph: Glyph,
}

impl Default for WeatherView {
    fn default() -> Self {
        Self {
            humidity: 0,
            wind: 0,
            temperature: 0,
            place_name: PLACEHOLDER_PLACE.to_string(),
            condition: String::new(),
            glyph: Glyph::Invalid,
        }
    }
}

impl WeatherView {
    /// Default record with the "Invalid City" place name
    pub fn invalid_city() -> Self {
        Self {
            place_name: INVALID_CITY.to_string(),
            ..Self::default()
        }
    }

    /// Build a record from raw provider readings, flooring the numbers
    pub fn from_readings(
        humidity: f64,
        wind_speed: f64,
        temperature: f64,
        place_name: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        let condition = condition.into();
        Self {
            humidity: floor_to_i32(humidity),
            wind: floor_to_i32(wind_speed),
            temperature: floor_to_i32(temperature),
            place_name: place_name.into(),
            glyph: Glyph::for_condition(&condition),
            condition,
        }
    }

    /// "London - Clouds", or just the place when there is no condition
    pub fn headline(&self) -> String {
        if self.condition.is_empty() {
            self.place_name.clone()
        } else {
            format!("{} - {}", self.place_name, self.condition)
        }
    }
}

// `as` saturates on overflow and maps NaN to 0
fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}

/// Outcome of one provider lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(WeatherView),
    /// The provider answered with `cod: "404"`
    NotFound,
}

impl Lookup {
    /// The record a panel should display for this outcome
    pub fn into_view(self) -> WeatherView {
        match self {
            Lookup::Found(view) => view,
            Lookup::NotFound => WeatherView::invalid_city(),
        }
    }
}

/// Geographic coordinates in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Where a position came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Configured,
    IpLookup,
}

/// A resolved user position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinates: Coordinates,
    /// City reported by the lookup service, if any
    pub place: Option<String>,
    pub source: LocationSource,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}
