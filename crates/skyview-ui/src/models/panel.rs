//! State shared by both weather panels.

use chrono::{DateTime, Local};

/// What a panel is doing, rendered next to its record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading,
    Loaded { at: DateTime<Local> },
    Failed { reason: String },
}

impl PanelStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelStatus::Loading)
    }
}

/// Hands out request numbers and remembers the latest one.
/// Only the latest request's result may touch the panel.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    in_flight: bool,
}

impl RequestTracker {
    /// Number for a new request; supersedes every earlier one
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight = true;
        self.latest
    }

    /// True if `seq` is the latest request and still awaited.
    /// Marks it settled.
    pub fn settle(&mut self, seq: u64) -> bool {
        if seq == self.latest && self.in_flight {
            self.in_flight = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let mut tracker = RequestTracker::default();
        assert_eq!(tracker.next(), 1);
        assert_eq!(tracker.next(), 2);
        assert_eq!(tracker.next(), 3);
    }

    #[test]
    fn only_latest_settles() {
        let mut tracker = RequestTracker::default();
        let first = tracker.next();
        let second = tracker.next();

        assert!(!tracker.settle(first));
        assert!(tracker.settle(second));
    }

    #[test]
    fn settles_once() {
        let mut tracker = RequestTracker::default();
        let seq = tracker.next();
        assert!(tracker.settle(seq));
        assert!(!tracker.settle(seq));
    }

    #[test]
    fn default_status_is_idle() {
        assert_eq!(PanelStatus::default(), PanelStatus::Idle);
        assert!(PanelStatus::Loading.is_loading());
    }
}
