//! Weather for a city typed by the user.

use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Local;
use skyview_core::AppError;
use skyview_weather::WeatherView;
use tokio_util::sync::CancellationToken;

use super::panel::{PanelStatus, RequestTracker};
use crate::bridge::WeatherServices;
use crate::services::{request_fetch_city, WeatherServiceMessage};

pub struct SearchPanel {
    input: String,
    view: WeatherView,
    status: PanelStatus,
    requests: RequestTracker,
    services: WeatherServices,
    cancel: CancellationToken,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
}

impl SearchPanel {
    pub fn new(services: &WeatherServices) -> Self {
        let (tx, rx) = channel();
        Self {
            input: String::new(),
            view: WeatherView::default(),
            status: PanelStatus::Idle,
            requests: RequestTracker::default(),
            services: services.clone(),
            cancel: CancellationToken::new(),
            tx,
            rx,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Search for the current input. Returns false (and does nothing) when
    /// the trimmed input is empty.
    pub fn submit(&mut self) -> bool {
        let city = self.input.trim();
        if city.is_empty() {
            return false;
        }
        let city = city.to_string();

        let seq = self.requests.next();
        self.status = PanelStatus::Loading;

        tracing::info!("Searching weather for {:?} (request {})", city, seq);
        request_fetch_city(
            &self.tx,
            &self.services.runtime,
            self.cancel.child_token(),
            seq,
            self.services.provider.clone(),
            city,
        );
        true
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
                // Every completed submission clears the field, stale or not
                let cleared = !self.input.is_empty();
                self.input.clear();

                if !self.requests.settle(seq) {
                    tracing::debug!("Dropping stale search result {}", seq);
                    return cleared;
                }

                match result {
                    Ok(lookup) => {
                        self.view = lookup.into_view();
                        self.status = PanelStatus::Loaded { at: Local::now() };
                    }
                    Err(e) => {
                        tracing::error!("City weather failed: {}", e);
                        self.view = WeatherView::default();
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

impl Drop for SearchPanel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
