//! Position lookup standing in for the host geolocation service.
//!
//! Fixed coordinates from config win; otherwise we ask an IP geolocation
//! service (ip-api.com compatible). A disabled locator answers like a host
//! whose user refused the permission prompt.

use crate::types::{Coordinates, LocationError, LocationSource, Position};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_LOOKUP_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
enum Strategy {
    Denied,
    Fixed(Coordinates),
    IpLookup { client: Client, url: String },
}

#[derive(Debug, Clone)]
pub struct Locator {
    strategy: Strategy,
}

impl Locator {
    /// A locator whose permission was refused
    pub fn denied() -> Self {
        Self {
            strategy: Strategy::Denied,
        }
    }

    /// Always answers with the given coordinates
    pub fn fixed(coordinates: Coordinates) -> Self {
        Self {
            strategy: Strategy::Fixed(coordinates),
        }
    }

    /// Looks the position up from the caller's public IP
    pub fn ip_lookup(url: impl Into<String>, timeout: Duration) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LocationError::Other(e.to_string()))?;

        Ok(Self {
            strategy: Strategy::IpLookup {
                client,
                url: url.into(),
            },
        })
    }

    /// Resolve the current position. Each call is an independent request.
    pub async fn current_position(&self) -> Result<Position, LocationError> {
        match &self.strategy {
            Strategy::Denied => {
                tracing::debug!("Location access is disabled");
                Err(LocationError::PermissionDenied)
            }
            Strategy::Fixed(coordinates) => {
                if !coordinates.is_valid() {
                    tracing::warn!(
                        "Invalid configured coordinates: {}, {}",
                        coordinates.latitude,
                        coordinates.longitude
                    );
                    return Err(LocationError::InvalidCoordinates {
                        latitude: coordinates.latitude,
                        longitude: coordinates.longitude,
                    });
                }
                Ok(Position {
                    coordinates: *coordinates,
                    place: None,
                    source: LocationSource::Configured,
                })
            }
            Strategy::IpLookup { client, url } => lookup_ip(client, url).await,
        }
    }
}

async fn lookup_ip(client: &Client, url: &str) -> Result<Position, LocationError> {
    let response = client.get(url).send().await.map_err(|e| {
        tracing::debug!("IP location request failed: {}", e);
        LocationError::ServiceUnavailable
    })?;

    if !response.status().is_success() {
        tracing::debug!("IP location lookup returned status {}", response.status());
        return Err(LocationError::ServiceUnavailable);
    }

    let body: IpLookupResponse = response
        .json()
        .await
        .map_err(|e| LocationError::Other(format!("Unreadable lookup response: {}", e)))?;

    if body.status != "success" {
        return Err(LocationError::Other(
            body.message.unwrap_or_else(|| format!("lookup status {}", body.status)),
        ));
    }

    let (Some(latitude), Some(longitude)) = (body.lat, body.lon) else {
        return Err(LocationError::Other("lookup response has no coordinates".into()));
    };

    let coordinates = Coordinates::new(latitude, longitude);
    if !coordinates.is_valid() {
        return Err(LocationError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }

    tracing::info!(
        "Located via IP: {:.4}, {:.4} ({})",
        latitude,
        longitude,
        body.city.as_deref().unwrap_or("unknown city")
    );

    Ok(Position {
        coordinates,
        place: body.city.filter(|c| !c.is_empty()),
        source: LocationSource::IpLookup,
    })
}
