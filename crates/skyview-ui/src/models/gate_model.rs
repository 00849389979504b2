//! The gate in front of the weather cards.
//!
//! Asks for the position once. A granted position reveals the cards after
//! the configured delay; a refusal parks the gate on a notice for good.

use std::sync::mpsc::{channel, Receiver, Sender};

use skyview_core::AppError;
use tokio_util::sync::CancellationToken;

use crate::bridge::WeatherServices;
use crate::services::{request_position, LocationServiceMessage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateState {
    /// Waiting for the position, or for the reveal delay
    #[default]
    Detecting,
    /// The cards are shown
    Revealed,
    /// The position was refused; `notice` explains what the user must do
    Denied { notice: String },
}

pub struct GateModel {
    state: GateState,
    /// The locator answered; only then may the reveal fire
    granted: bool,
    requested: bool,
    services: WeatherServices,
    cancel: CancellationToken,
    tx: Sender<LocationServiceMessage>,
    rx: Receiver<LocationServiceMessage>,
}

impl GateModel {
    pub fn new(services: WeatherServices) -> Self {
        let (tx, rx) = channel();
        Self {
            state: GateState::default(),
            granted: false,
            requested: false,
            services,
            cancel: CancellationToken::new(),
            tx,
            rx,
        }
    }

    /// Ask for the position. Only the first call does anything.
    pub fn mount(&mut self) {
        if self.requested {
            return;
        }
        self.requested = true;

        tracing::info!("Detecting location");
        request_position(
            &self.tx,
            &self.services.runtime,
            self.cancel.child_token(),
            self.services.locator.clone(),
            self.services.reveal_delay,
        );
    }

    /// Drain pending messages. Returns true if the state changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.apply(msg);
        }
        changed
    }

    /// Apply one message. Returns true if the state changed.
    pub fn apply(&mut self, msg: LocationServiceMessage) -> bool {
        if self.state != GateState::Detecting {
            return false;
        }

        match msg {
            LocationServiceMessage::PositionGranted => {
                self.granted = true;
                false
            }
            LocationServiceMessage::RevealDue if !self.granted => {
                tracing::warn!("Reveal requested before the position was granted");
                false
            }
            LocationServiceMessage::RevealDue => {
                tracing::info!("Revealing weather cards");
                self.state = GateState::Revealed;
                true
            }
            LocationServiceMessage::PositionFailed(e) => {
                let notice = AppError::from(e).user_message().to_string();
                self.state = GateState::Denied { notice };
                true
            }
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == GateState::Revealed
    }
}

impl Drop for GateModel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
