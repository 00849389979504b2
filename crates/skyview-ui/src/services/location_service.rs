//! Location backend: asks the locator for the user's position.
//! Runs on the tokio runtime; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use skyview_weather::Locator;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Error type for position lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The user (or config) refused location access
    Denied,
    Unavailable(String),
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Denied => write!(f, "Location access denied"),
            LocationError::Unavailable(s) => write!(f, "Location unavailable: {}", s),
        }
    }
}

impl std::error::Error for LocationError {}

impl From<skyview_weather::LocationError> for LocationError {
    fn from(e: skyview_weather::LocationError) -> Self {
        match e {
            skyview_weather::LocationError::PermissionDenied => LocationError::Denied,
            other => LocationError::Unavailable(other.to_string()),
        }
    }
}

/// Messages sent from the gate's background task back to the foreground
#[derive(Debug)]
pub enum LocationServiceMessage {
    /// The position was granted; the reveal timer is running
    PositionGranted,
    /// The reveal delay has elapsed
    RevealDue,
    /// The position request failed
    PositionFailed(LocationError),
}

/// Request the position once, then wait `reveal_delay` before sending `RevealDue`.
/// Nothing is sent after `cancel` fires.
pub fn request_position(
    tx: &Sender<LocationServiceMessage>,
    runtime: &Handle,
    cancel: CancellationToken,
    locator: Arc<Locator>,
    reveal_delay: Duration,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let position = tokio::select! {
            _ = cancel.cancelled() => return,
            position = locator.current_position() => position,
        };

        match position {
            Ok(position) => {
                tracing::info!(
                    "Location granted: {:.4}, {:.4}",
                    position.coordinates.latitude,
                    position.coordinates.longitude
                );
                if tx.send(LocationServiceMessage::PositionGranted).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!("Error getting location: {}", e);
                let _ = tx.send(LocationServiceMessage::PositionFailed(e.into()));
                return;
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(reveal_delay) => {
                let _ = tx.send(LocationServiceMessage::RevealDue);
            }
        }
    });
}
