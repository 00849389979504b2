//! Weather backend: async weather fetching for the panels.
//! All network work runs on the tokio runtime; results sent via mpsc,
//! tagged with the sequence number of the request that produced them.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skyview_core::error::ReqwestErrorExt;
use skyview_core::NetworkError;
use skyview_weather::{Locator, Lookup, WeatherProvider};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::location_service::LocationError;

/// Error type for weather operations
#[derive(Debug)]
pub enum WeatherError {
    Network(NetworkError),
    /// The provider answered with something we cannot read
    InvalidResponse(String),
    Location(LocationError),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Network(e) => write!(f, "Weather error: {}", e),
            WeatherError::InvalidResponse(s) => write!(f, "Weather error: {}", s),
            WeatherError::Location(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<skyview_weather::WeatherError> for WeatherError {
    fn from(e: skyview_weather::WeatherError) -> Self {
        match e {
            skyview_weather::WeatherError::Network(e) => {
                WeatherError::Network(e.into_network_error())
            }
            skyview_weather::WeatherError::Parse(s) => WeatherError::InvalidResponse(s),
        }
    }
}

/// Messages sent from async operations back to the foreground
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of the request numbered `seq`
    FetchDone {
        seq: u64,
        result: Result<Lookup, WeatherError>,
    },
}

/// Locate the user, then fetch the weather there.
/// Sends `FetchDone` unless `cancel` fires first.
pub fn request_fetch_here(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &Handle,
    cancel: CancellationToken,
    seq: u64,
    provider: Arc<WeatherProvider>,
    locator: Arc<Locator>,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let work = async {
            let position = match locator.current_position().await {
                Ok(position) => position,
                Err(e) => return Err(WeatherError::Location(e.into())),
            };
            provider
                .current_at(position.coordinates)
                .await
                .map_err(WeatherError::from)
        };

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Location weather request {} cancelled", seq);
                return;
            }
            result = work => result,
        };

        let _ = tx.send(WeatherServiceMessage::FetchDone { seq, result });
    });
}

/// Fetch the weather for a city name.
/// Sends `FetchDone` unless `cancel` fires first.
pub fn request_fetch_city(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &Handle,
    cancel: CancellationToken,
    seq: u64,
    provider: Arc<WeatherProvider>,
    city: String,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("City weather request {} cancelled", seq);
                return;
            }
            result = provider.current_in(&city) => result.map_err(WeatherError::from),
        };

        let _ = tx.send(WeatherServiceMessage::FetchDone { seq, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::TryRecvError;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn weather_error_display() {
        assert!(format!("{}", WeatherError::Network(NetworkError::Timeout)).contains("Weather"));
        assert!(format!("{}", WeatherError::InvalidResponse("bad".into())).contains("bad"));
        assert!(format!("{}", WeatherError::Location(LocationError::Denied)).contains("denied"));
    }

    #[test]
    fn provider_errors_map() {
        let err: WeatherError = skyview_weather::WeatherError::Parse("no main".into()).into();
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn city_fetch_reports_sequence() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let provider = Arc::new(
            WeatherProvider::new(mock_server.uri(), "key", Duration::from_secs(5)).unwrap(),
        );
        let (tx, rx) = std::sync::mpsc::channel();
        request_fetch_city(
            &tx,
            &Handle::current(),
            CancellationToken::new(),
            7,
            provider,
            "Zzzznotacity".into(),
        );

        let mut received = None;
        for _ in 0..200 {
            if let Ok(msg) = rx.try_recv() {
                received = Some(msg);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        match received {
            Some(WeatherServiceMessage::FetchDone { seq, result }) => {
                assert_eq!(seq, 7);
                assert_eq!(result.unwrap(), Lookup::NotFound);
            }
            None => panic!("no result received"),
        }
    }

    async fn next_result(
        rx: &std::sync::mpsc::Receiver<WeatherServiceMessage>,
    ) -> Option<WeatherServiceMessage> {
        for _ in 0..200 {
            if let Ok(msg) = rx.try_recv() {
                return Some(msg);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    #[tokio::test]
    async fn server_outage_page_reads_as_unusable_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(503).set_body_string("<html>Service Unavailable</html>"),
            )
            .mount(&mock_server)
            .await;

        let provider = Arc::new(
            WeatherProvider::new(mock_server.uri(), "key", Duration::from_secs(5)).unwrap(),
        );
        let (tx, rx) = std::sync::mpsc::channel();
        request_fetch_city(
            &tx,
            &Handle::current(),
            CancellationToken::new(),
            1,
            provider,
            "London".into(),
        );

        match next_result(&rx).await {
            Some(WeatherServiceMessage::FetchDone { result: Err(e), .. }) => {
                assert!(matches!(e, WeatherError::InvalidResponse(_)), "{e:?}");
                let app_err: skyview_core::AppError = e.into();
                assert!(app_err.user_message().contains("API key"));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_location_skips_the_provider() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = Arc::new(
            WeatherProvider::new(mock_server.uri(), "key", Duration::from_secs(5)).unwrap(),
        );
        let (tx, rx) = std::sync::mpsc::channel();
        request_fetch_here(
            &tx,
            &Handle::current(),
            CancellationToken::new(),
            3,
            provider,
            Arc::new(Locator::denied()),
        );

        match next_result(&rx).await {
            Some(WeatherServiceMessage::FetchDone { seq, result }) => {
                assert_eq!(seq, 3);
                assert!(matches!(
                    result,
                    Err(WeatherError::Location(LocationError::Denied))
                ));
            }
            None => panic!("no result received"),
        }
    }

    #[tokio::test]
    async fn cancelled_fetch_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "cod": 200 }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let provider = Arc::new(
            WeatherProvider::new(mock_server.uri(), "key", Duration::from_secs(10)).unwrap(),
        );
        let (tx, rx) = std::sync::mpsc::channel();
        let cancel = CancellationToken::new();
        request_fetch_city(
            &tx,
            &Handle::current(),
            cancel.clone(),
            1,
            provider,
            "London".into(),
        );
        drop(tx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }
}
