pub mod gate_model;
pub mod location_model;
pub mod panel;
pub mod search_model;

pub use gate_model::{GateModel, GateState};
pub use location_model::LocationPanel;
pub use panel::{PanelStatus, RequestTracker};
pub use search_model::SearchPanel;

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use skyview_weather::{Locator, WeatherProvider};
    use tokio::runtime::Handle;

    use crate::bridge::WeatherServices;

    /// Services on the current runtime, talking to `base_url`
    pub fn services(base_url: &str, locator: Locator, reveal_delay: Duration) -> WeatherServices {
        let provider = WeatherProvider::new(base_url, "test-key", Duration::from_secs(5))
            .expect("provider");
        WeatherServices::new(provider, locator, Handle::current(), reveal_delay)
    }

    /// Re-check `condition` every 10ms for up to 2s
    pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}
