//! Presentation seam: everything the widget shows goes through [`RenderPort`].

use chrono::NaiveDate;
use skycast_weather::{CurrentConditions, WeatherError};

/// Operations the widget needs from whatever draws it (terminal, GUI, test
/// recorder). Calls arrive from the widget's tasks, hence `Send + Sync`.
pub trait RenderPort: Send + Sync {
    /// Replace the suggestion panel contents and reveal it.
    fn show_suggestions(&self, labels: &[String]);
    fn hide_suggestions(&self);
    /// Spinner on and search control disabled while `loading`.
    fn set_loading(&self, loading: bool);
    fn show_error(&self, message: &str);
    fn hide_error(&self);
    fn show_weather(&self, view: &WeatherView);
    fn hide_weather(&self);
}

/// Where autocomplete failures go. They never reach the user.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, query: &str, error: &WeatherError);
}

/// Logs autocomplete failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, query: &str, error: &WeatherError) {
        tracing::warn!("Error fetching suggestions for {:?}: {}", query, error);
    }
}

/// Display strings for the weather card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub location: String,
    pub date: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl WeatherView {
    pub fn new(
        name: &str,
        country: Option<&str>,
        current: &CurrentConditions,
        today: NaiveDate,
    ) -> Self {
        Self {
            location: format!("{}, {}", name, country.unwrap_or_default()),
            date: today.format("%A, %b %-d").to_string(),
            temperature: round_half_up(current.temperature).to_string(),
            description: current.weather_code.description().to_string(),
            feels_like: format!("{}°C", round_half_up(current.apparent_temperature)),
            humidity: format!("{}%", current.relative_humidity),
            wind_speed: format!("{} km/h", current.wind_speed),
        }
    }
}

/// Nearest integer, halves toward positive infinity (-2.5 -> -2).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
