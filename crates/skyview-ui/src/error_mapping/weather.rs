use crate::services::weather_service::WeatherError as UiWeatherError;
use skyview_core::{AppError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Network(e) => AppError::Network(e),
            UiWeatherError::InvalidResponse(s) => AppError::Weather(WeatherError::InvalidResponse(s)),
            UiWeatherError::Location(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyview_core::NetworkError;

    #[test]
    fn unreadable_response_mentions_api_key() {
        let app_err: AppError = UiWeatherError::InvalidResponse("no main".into()).into();
        assert!(app_err.user_message().contains("API key"));
    }

    #[test]
    fn network_errors_pass_through() {
        let app_err: AppError = UiWeatherError::Network(NetworkError::Timeout).into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }
}
