//! Plain-text rendering of each view's display mode.

use std::fmt::Write;

use weather_core::{DisplayMode, HistoricalReport, IconKey, MarineReport, Metric, WeatherSnapshot};

pub fn icon(key: IconKey) -> &'static str {
    match key {
        IconKey::Thermometer => "🌡️",
        IconKey::Humidity => "💧",
        IconKey::Wind => "💨",
        IconKey::Pressure => "📊",
        IconKey::Waves => "🌊",
        IconKey::Visibility => "👁️",
        IconKey::Condition => "☁️",
    }
}

fn metrics_block(metrics: &[Metric]) -> String {
    let width = metrics.iter().map(|m| m.label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for m in metrics {
        let _ = writeln!(out, "  {} {:<width$}  {}", icon(m.icon), m.label, m.value);
    }
    out
}

/// Shared handling for the modes that look the same in every view.
fn render<T>(
    mode: DisplayMode<'_, T>,
    idle: &str,
    loading: &str,
    ready: impl FnOnce(&T) -> String,
) -> String {
    match mode {
        DisplayMode::Idle => format!("{idle}\n"),
        DisplayMode::Loading => format!("{loading}\n"),
        DisplayMode::Error(message) => format!("Unable to load weather: {message}\n"),
        DisplayMode::Empty => "No weather data for this query.\n".to_string(),
        DisplayMode::Ready(payload) => ready(payload),
    }
}

pub fn current(mode: DisplayMode<'_, WeatherSnapshot>) -> String {
    render(
        mode,
        "Search for a location to see current weather",
        "Loading weather data...",
        |snapshot| {
            let mut out = snapshot.location.display_name();
            if let Some(localtime) = &snapshot.location.localtime {
                let _ = write!(out, " ({localtime})");
            }
            out.push('\n');
            out.push_str(&metrics_block(&snapshot.metrics()));
            out
        },
    )
}

pub fn historical(mode: DisplayMode<'_, HistoricalReport>) -> String {
    render(
        mode,
        "Pick a date to load historical weather",
        "Loading historical data...",
        |report| {
            let place = report.location.as_ref().map(|l| l.name.as_str()).unwrap_or("Unknown");
            let mut out = format!("{place} on {}\n", report.date);
            out.push_str(&metrics_block(&report.metrics()));
            out
        },
    )
}

pub fn marine(mode: DisplayMode<'_, MarineReport>) -> String {
    render(
        mode,
        "Enter latitude and longitude to load marine conditions",
        "Fetching marine conditions...",
        |report| {
            let mut out = format!(
                "Marine conditions at {:.4}, {:.4}\n",
                report.coordinates.latitude, report.coordinates.longitude
            );
            out.push_str(&metrics_block(&report.metrics()));
            out
        },
    )
}
