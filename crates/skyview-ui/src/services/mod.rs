pub mod location_service;
pub mod weather_service;

pub use location_service::{request_position, LocationError, LocationServiceMessage};
pub use weather_service::{
    request_fetch_city, request_fetch_here, WeatherError, WeatherServiceMessage,
};
