use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable holding the weather provider API key.
/// Takes precedence over `weather.api_key` in the config file.
pub const API_KEY_ENV: &str = "SKYVIEW_WEATHER_API_KEY";

const APP_DIR: &str = "skyview";
const CONFIG_FILE: &str = "config.toml";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Where the user's position comes from
    #[serde(default)]
    pub location: LocationConfig,

    /// Card layout and timing
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Provider root, e.g. https://api.openweathermap.org
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Prefer the environment variable; this is only a fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl WeatherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// When false, position requests are refused as if the user denied access
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fixed position; both must be set to take effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// IP geolocation endpoint used when no fixed position is configured
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
}

fn default_true() -> bool {
    true
}

fn default_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latitude: None,
            longitude: None,
            lookup_url: default_lookup_url(),
        }
    }
}

impl LocationConfig {
    /// Configured coordinates, when both halves are present
    pub fn fixed_coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between the position being granted and the cards appearing
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,

    /// Outer width of each card in columns
    #[serde(default = "default_card_width")]
    pub card_width: u16,

    /// How often the foreground loop drains service channels
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_reveal_delay() -> u64 {
    3000
}

fn default_card_width() -> u16 {
    36
}

fn default_poll_interval() -> u64 {
    50
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: default_reveal_delay(),
            card_width: default_card_width(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl UiConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Pick the API key: a non-empty environment value wins over the file value
pub fn resolve_api_key(from_file: Option<&str>, from_env: Option<String>) -> Option<String> {
    from_env
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| {
            from_file
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        })
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            tracing::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            config
        };

        if let Some(parent) = path.parent() {
            config.config_dir = parent.to_path_buf();
        }

        Ok(config)
    }

    /// The effective API key (environment first, then file)
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(
            self.weather.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured - set {} to fetch weather", API_KEY_ENV),
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (Some(_), None) => {
                result.add_error("location.longitude", "Latitude is set but longitude is missing")
            }
            (None, Some(_)) => {
                result.add_error("location.latitude", "Longitude is set but latitude is missing")
            }
            (None, None) => {
                if self.location.enabled {
                    self.validate_url(
                        &self.location.lookup_url,
                        "location.lookup_url",
                        &mut result,
                    );
                }
            }
        }

        if !self.location.enabled {
            result.add_warning(
                "location.enabled",
                "Location access is disabled - the cards will never appear",
            );
        }

        if self.ui.card_width < 24 {
            result.add_error("ui.card_width", "Card width must be at least 24 columns");
        } else if self.ui.card_width > 120 {
            result.add_warning("ui.card_width", "Card width is unusually large (>120)");
        }

        if self.ui.poll_interval_ms == 0 {
            result.add_error("ui.poll_interval_ms", "Poll interval must be greater than 0");
        }

        if self.ui.reveal_delay_ms > 30_000 {
            result.add_warning("ui.reveal_delay_ms", "Reveal delay is more than 30 seconds");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        config.weather.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_timings() {
        let config = Config::default();
        assert_eq!(config.ui.reveal_delay(), Duration::from_secs(3));
        assert_eq!(config.weather.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = keyed_config();
        config.weather.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = keyed_config();
        config.location.lookup_url = "ftp://ip-api.com/json".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_lookup_url_ignored_with_fixed_coordinates() {
        let mut config = keyed_config();
        config.location.lookup_url = "nonsense".to_string();
        config.location.latitude = Some(51.5);
        config.location.longitude = Some(-0.12);
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_half_specified_coordinates() {
        let mut config = keyed_config();
        config.location.latitude = Some(51.5);
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "location.longitude"));
        assert_eq!(config.location.fixed_coordinates(), None);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let mut config = keyed_config();
        config.location.latitude = Some(95.0);
        config.location.longitude = Some(200.0);
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));
        assert!(result.errors.iter().any(|e| e.field == "location.longitude"));
    }

    #[test]
    fn test_zero_timeout_and_narrow_card() {
        let mut config = keyed_config();
        config.weather.request_timeout_secs = 0;
        config.ui.card_width = 10;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.request_timeout_secs"));
        assert!(result.errors.iter().any(|e| e.field == "ui.card_width"));
    }

    #[test]
    fn test_disabled_location_is_warning() {
        let mut config = keyed_config();
        config.location.enabled = false;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "location.enabled"));
    }

    #[test]
    fn test_resolve_api_key_prefers_env() {
        assert_eq!(
            resolve_api_key(Some("file"), Some("env".into())).as_deref(),
            Some("env")
        );
        assert_eq!(resolve_api_key(Some("file"), None).as_deref(), Some("file"));
        assert_eq!(
            resolve_api_key(Some("file"), Some("   ".into())).as_deref(),
            Some("file")
        );
        assert_eq!(resolve_api_key(None, None), None);
        assert_eq!(resolve_api_key(Some(""), None), None);
    }

    #[test]
    fn test_load_from_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path().join("nested"));
        assert_eq!(config.ui.reveal_delay_ms, 3000);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("api_key"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[location]\nlatitude = 51.5\nlongitude = -0.12\n\n[ui]\nreveal_delay_ms = 0\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.location.fixed_coordinates(), Some((51.5, -0.12)));
        assert!(config.location.enabled);
        assert_eq!(config.ui.reveal_delay_ms, 0);
        assert_eq!(config.ui.card_width, 36);
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
    }

    #[test]
    fn test_load_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\nreveal_delay_ms = ").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
