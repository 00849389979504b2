//! Terminal front end: models driven by background service tasks, rendered
//! as fixed-width text cards.

pub mod bridge;
pub mod card;
pub mod dashboard;
pub mod error_mapping;
pub mod models;
pub mod services;

pub use bridge::WeatherServices;
pub use dashboard::Dashboard;
pub use models::{GateModel, GateState, LocationPanel, PanelStatus, SearchPanel};
