//! The whole screen: the gate, then the two panels once it reveals.

use crate::bridge::WeatherServices;
use crate::card;
use crate::models::{GateModel, GateState, LocationPanel, SearchPanel};

const CARD_GAP: usize = 2;

pub struct Dashboard {
    services: WeatherServices,
    card_width: usize,
    gate: GateModel,
    location: Option<LocationPanel>,
    search: Option<SearchPanel>,
}

impl Dashboard {
    pub fn new(services: WeatherServices, card_width: usize) -> Self {
        Self {
            gate: GateModel::new(services.clone()),
            services,
            card_width,
            location: None,
            search: None,
        }
    }

    /// Start detecting the position
    pub fn start(&mut self) {
        self.gate.mount();
    }

    /// Drain every model's channel. Returns true if the screen should be redrawn.
    pub fn poll(&mut self) -> bool {
        let mut changed = self.gate.poll_channel();

        if self.gate.is_revealed() && self.location.is_none() {
            self.mount_panels();
            changed = true;
        }

        if let Some(location) = self.location.as_mut() {
            changed |= location.poll_channel();
        }
        if let Some(search) = self.search.as_mut() {
            changed |= search.poll_channel();
        }
        changed
    }

    fn mount_panels(&mut self) {
        tracing::debug!("Mounting weather panels");
        let mut location = LocationPanel::new(&self.services);
        location.mount();
        self.location = Some(location);
        self.search = Some(SearchPanel::new(&self.services));
    }

    /// Submit a line typed by the user as a city search.
    /// Returns false while the panels are hidden or for blank input.
    pub fn submit_search(&mut self, line: &str) -> bool {
        match self.search.as_mut() {
            Some(search) => {
                search.set_input(line);
                search.submit()
            }
            None => {
                tracing::debug!("Search ignored; panels not shown yet");
                false
            }
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.gate.is_revealed()
    }

    pub fn location(&self) -> Option<&LocationPanel> {
        self.location.as_ref()
    }

    pub fn search(&self) -> Option<&SearchPanel> {
        self.search.as_ref()
    }

    /// Current screen contents
    pub fn render(&self) -> String {
        let lines = match (self.gate.state(), &self.location, &self.search) {
            (GateState::Denied { notice }, _, _) => card::notice_card(notice, self.card_width),
            (GateState::Revealed, Some(location), Some(search)) => {
                let left = card::location_card(location.view(), location.status(), self.card_width);
                let right = card::search_card(
                    search.view(),
                    search.status(),
                    search.input(),
                    self.card_width,
                );
                card::side_by_side(&left, &right, CARD_GAP)
            }
            _ => card::detecting_card(self.card_width),
        };
        lines.join("\n")
    }
}
