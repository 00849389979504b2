//! Weather at the user's own position.
//!
//! Locates independently of the gate, fetches once per mount and keeps the
//! last good record when a later request fails.

use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Local;
use skyview_core::AppError;
use skyview_weather::WeatherView;
use tokio_util::sync::CancellationToken;

use super::panel::{PanelStatus, RequestTracker};
use crate::bridge::WeatherServices;
use crate::services::{request_fetch_here, WeatherServiceMessage};

pub struct LocationPanel {
    view: WeatherView,
    status: PanelStatus,
    requests: RequestTracker,
    services: WeatherServices,
    cancel: CancellationToken,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
}

impl LocationPanel {
    pub fn new(services: &WeatherServices) -> Self {
        let (tx, rx) = channel();
        Self {
            view: WeatherView::default(),
            status: PanelStatus::Idle,
            requests: RequestTracker::default(),
            services: services.clone(),
            cancel: CancellationToken::new(),
            tx,
            rx,
        }
    }

    /// Locate, then fetch. Supersedes any request still in flight.
    pub fn mount(&mut self) {
        let seq = self.requests.next();
        self.status = PanelStatus::Loading;

        tracing::info!("Fetching weather for current location (request {})", seq);
        request_fetch_here(
            &self.tx,
            &self.services.runtime,
            self.cancel.child_token(),
            seq,
            self.services.provider.clone(),
            self.services.locator.clone(),
        );
    }

    /// Drain pending results. Returns true if anything visible changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.apply(msg);
        }
        changed
    }

    pub fn apply(&mut self, msg: WeatherServiceMessage) -> bool {
        match msg {
            WeatherServiceMessage::FetchDone { seq, result } => {
                if !self.requests.settle(seq) {
                    tracing::debug!("Dropping stale location result {}", seq);
                    return false;
                }

                match result {
                    Ok(lookup) => {
                        self.view = lookup.into_view();
                        self.status = PanelStatus::Loaded { at: Local::now() };
                    }
                    Err(e) => {
                        tracing::error!("Location weather failed: {}", e);
                        // Keep whatever was shown before
                        self.status = PanelStatus::Failed {
                            reason: AppError::from(e).user_message().to_string(),
                        };
                    }
                }
                true
            }
        }
    }

    pub fn view(&self) -> &WeatherView {
        &self.view
    }

    pub fn status(&self) -> &PanelStatus {
        &self.status
    }
}

impl Drop for LocationPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
