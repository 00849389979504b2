use crate::services::location_service::LocationError as UiLocationError;
use skyview_core::{AppError, LocationError};

impl From<UiLocationError> for AppError {
    fn from(e: UiLocationError) -> Self {
        match e {
            UiLocationError::Denied => AppError::Location(LocationError::AccessDenied),
            UiLocationError::Unavailable(s) => AppError::Location(LocationError::Unavailable(s)),
        }
    }
}
