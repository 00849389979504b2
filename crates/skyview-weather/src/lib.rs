//! Weather lookups for Skyview
//!
//! Current conditions from OpenWeatherMap, normalized into the
//! [`WeatherView`] record the panels display, plus the position lookup
//! used by the location panel.

pub mod location;
pub mod provider;
pub mod types;

pub use location::Locator;
pub use provider::WeatherProvider;
pub use types::*;
