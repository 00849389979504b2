//! Fixed-width text cards drawn on the terminal.
//!
//! Every line of a card is exactly `width` characters wide so cards can be
//! placed next to each other without further measuring.

use skyview_weather::WeatherView;

use crate::models::PanelStatus;

/// Narrowest card that still fits the body lines
pub const MIN_WIDTH: usize = 24;

pub const LOCATION_TITLE: &str = "Current Location Weather";
pub const SEARCH_TITLE: &str = "Search Weather";
pub const DETECTING_TEXT: &str = "Detecting your location";

/// Card for the location panel
pub fn location_card(view: &WeatherView, status: &PanelStatus, width: usize) -> Vec<String> {
    let mut body = weather_lines(view);
    body.extend(status_line(status));
    boxed(LOCATION_TITLE, &body, width)
}

/// Card for the search panel, with the input line on top
pub fn search_card(
    view: &WeatherView,
    status: &PanelStatus,
    input: &str,
    width: usize,
) -> Vec<String> {
    let mut body = vec![format!("Search: {}", input), String::new()];
    body.extend(weather_lines(view));
    body.extend(status_line(status));
    boxed(SEARCH_TITLE, &body, width)
}

/// Placeholder shown while the gate waits
pub fn detecting_card(width: usize) -> Vec<String> {
    boxed("Skyview", &[String::new(), format!("{}…", DETECTING_TEXT), String::new()], width)
}

/// Shown instead of the content when the gate was refused
pub fn notice_card(notice: &str, width: usize) -> Vec<String> {
    let inner = inner_width(width);
    let mut body = vec![String::new()];
    body.extend(wrap(notice, inner));
    body.push(String::new());
    boxed("Location unavailable", &body, width)
}

/// Join two cards column-wise, `gap` spaces apart
pub fn side_by_side(left: &[String], right: &[String], gap: usize) -> Vec<String> {
    let left_width = left.first().map_or(0, |l| l.chars().count());
    let rows = left.len().max(right.len());
    let spacer = " ".repeat(gap);

    (0..rows)
        .map(|i| {
            let l = left
                .get(i)
                .cloned()
                .unwrap_or_else(|| " ".repeat(left_width));
            let r = right.get(i).map(String::as_str).unwrap_or("");
            format!("{}{}{}", l, spacer, r).trim_end().to_string()
        })
        .collect()
}

fn weather_lines(view: &WeatherView) -> Vec<String> {
    vec![
        format!("{}  {}°C", view.glyph.symbol(), view.temperature),
        view.headline(),
        String::new(),
        format!("{} %  Humidity", view.humidity),
        format!("{} m/s  Wind Speed", view.wind),
    ]
}

fn status_line(status: &PanelStatus) -> Option<String> {
    match status {
        PanelStatus::Idle => None,
        PanelStatus::Loading => Some("Loading…".to_string()),
        PanelStatus::Loaded { at } => Some(format!("Updated {}", at.format("%H:%M"))),
        PanelStatus::Failed { reason } => Some(format!("! {}", reason)),
    }
}

fn inner_width(width: usize) -> usize {
    width.max(MIN_WIDTH) - 4
}

fn boxed(title: &str, body: &[String], width: usize) -> Vec<String> {
    let width = width.max(MIN_WIDTH);
    let inner = inner_width(width);

    // "┌─ " + title + " " + dashes + "┐"
    let title = fit(title, width - 6);
    let dashes = width - 5 - title.chars().count();
    let mut lines = vec![format!("┌─ {} {}┐", title, "─".repeat(dashes))];

    lines.extend(body.iter().map(|line| format!("│ {} │", pad(&fit(line, inner), inner))));
    lines.push(format!("└{}┘", "─".repeat(width - 2)));
    lines
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
fn fit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
