//! Test doubles shared by the widget integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use skycast_weather::{
    CurrentConditions, ForecastSource, PlaceCandidate, PlaceLookup, Service, WeatherCode,
    WeatherError,
};
use skycast_widget::{DiagnosticSink, RenderPort, WeatherView};
use tokio_util::sync::CancellationToken;

/// Everything the widget asked the render port to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    ShowSuggestions(Vec<String>),
    HideSuggestions,
    Loading(bool),
    ShowError(String),
    HideError,
    ShowWeather(WeatherView),
    HideWeather,
}

#[derive(Default)]
pub struct RecordingRender {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRender {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Every suggestion list that was shown
    pub fn shown_lists(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::ShowSuggestions(labels) => Some(labels.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether the suggestion panel is visible after replaying all calls
    pub fn suggestions_visible(&self) -> bool {
        self.calls
            .lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                RenderCall::ShowSuggestions(_) => Some(true),
                RenderCall::HideSuggestions => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn last_error(&self) -> Option<String> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::ShowError(message) => Some(message.clone()),
            _ => None,
        })
    }

    pub fn last_weather(&self) -> Option<WeatherView> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::ShowWeather(view) => Some(view.clone()),
            _ => None,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.calls
            .lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                RenderCall::Loading(loading) => Some(*loading),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl RenderPort for RecordingRender {
    fn show_suggestions(&self, labels: &[String]) {
        self.calls.lock().push(RenderCall::ShowSuggestions(labels.to_vec()));
    }

    fn hide_suggestions(&self) {
        self.calls.lock().push(RenderCall::HideSuggestions);
    }

    fn set_loading(&self, loading: bool) {
        self.calls.lock().push(RenderCall::Loading(loading));
    }

    fn show_error(&self, message: &str) {
        self.calls.lock().push(RenderCall::ShowError(message.to_string()));
    }

    fn hide_error(&self) {
        self.calls.lock().push(RenderCall::HideError);
    }

    fn show_weather(&self, view: &WeatherView) {
        self.calls.lock().push(RenderCall::ShowWeather(view.clone()));
    }

    fn hide_weather(&self) {
        self.calls.lock().push(RenderCall::HideWeather);
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, query: &str, error: &WeatherError) {
        self.reports.lock().push((query.to_string(), error.to_string()));
    }
}

/// Scripted result for one query
#[derive(Debug, Clone)]
pub enum Outcome {
    Places(Vec<PlaceCandidate>),
    Unavailable(u16),
    NotFound,
    /// Fails below HTTP, as a refused connection or unreadable body would
    Transport,
}

impl Outcome {
    fn into_result(self) -> Result<Vec<PlaceCandidate>, WeatherError> {
        match self {
            Outcome::Places(places) => Ok(places),
            Outcome::Unavailable(status) => Err(WeatherError::ServiceUnavailable {
                service: Service::Geocoding,
                status,
            }),
            Outcome::NotFound => Err(WeatherError::NotFound),
            Outcome::Transport => Err(WeatherError::Transport(transport_error())),
        }
    }
}

// A request that cannot be built yields a real reqwest::Error without any I/O,
// which keeps paused-clock tests deterministic.
fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
}

/// Geocoding double. Each query answers after its scripted delay; unknown
/// queries answer immediately with no places.
#[derive(Default)]
pub struct FakeLookup {
    script: Mutex<HashMap<String, (Duration, Outcome)>>,
    calls: Mutex<Vec<String>>,
    /// Settle normally even after cancellation, like a transport that
    /// finished before noticing the abort
    ignore_cancel: bool,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignoring_cancel() -> Self {
        Self {
            ignore_cancel: true,
            ..Self::default()
        }
    }

    pub fn respond(self, query: &str, delay: Duration, outcome: Outcome) -> Self {
        self.script
            .lock()
            .insert(query.to_string(), (delay, outcome));
        self
    }

    /// Queries that reached the lookup, in issue order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn scripted(&self, query: &str) -> (Duration, Outcome) {
        let script = self.script.lock();
        script
            .get(query)
            .cloned()
            .unwrap_or((Duration::ZERO, Outcome::Places(Vec::new())))
    }
}

impl PlaceLookup for FakeLookup {
    async fn suggest(
        &self,
        query: &str,
        _max_results: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PlaceCandidate>, WeatherError> {
        self.calls.lock().push(query.to_string());
        let (delay, outcome) = self.scripted(query);

        if self.ignore_cancel {
            tokio::time::sleep(delay).await;
            return outcome.into_result();
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WeatherError::Cancelled),
            _ = tokio::time::sleep(delay) => outcome.into_result(),
        }
    }

    async fn locate(&self, name: &str) -> Result<PlaceCandidate, WeatherError> {
        self.calls.lock().push(name.to_string());
        let (delay, outcome) = self.scripted(name);
        tokio::time::sleep(delay).await;
        outcome
            .into_result()?
            .into_iter()
            .next()
            .ok_or(WeatherError::NotFound)
    }
}

/// Forecast double returning fixed conditions or a fixed failure status.
pub struct FakeForecast {
    result: Result<CurrentConditions, u16>,
    requests: Mutex<Vec<(f64, f64)>>,
}

impl FakeForecast {
    pub fn returning(temperature: f64, apparent: f64, code: i32) -> Self {
        Self {
            result: Ok(CurrentConditions {
                temperature,
                apparent_temperature: apparent,
                relative_humidity: 55.0,
                wind_speed: 12.3,
                weather_code: WeatherCode(code),
                is_day: true,
                precipitation: 0.0,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            result: Err(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(f64, f64)> {
        self.requests.lock().clone()
    }
}

impl ForecastSource for FakeForecast {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions, WeatherError> {
        self.requests.lock().push((latitude, longitude));
        self.result
            .clone()
            .map_err(|status| WeatherError::ServiceUnavailable {
                service: Service::Weather,
                status,
            })
    }
}

/// Shares a double between the widget (which takes ownership) and the test.
pub struct Shared<T>(pub Arc<T>);

impl<T: PlaceLookup> PlaceLookup for Shared<T> {
    async fn suggest(
        &self,
        query: &str,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PlaceCandidate>, WeatherError> {
        self.0.suggest(query, max_results, cancel).await
    }

    async fn locate(&self, name: &str) -> Result<PlaceCandidate, WeatherError> {
        self.0.locate(name).await
    }
}

impl<T: ForecastSource> ForecastSource for Shared<T> {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions, WeatherError> {
        self.0.current(latitude, longitude).await
    }
}

pub fn place(name: &str, admin1: Option<&str>, country: Option<&str>, lat: f64, lon: f64) -> PlaceCandidate {
    PlaceCandidate {
        name: name.to_string(),
        admin1: admin1.map(String::from),
        country: country.map(String::from),
        latitude: lat,
        longitude: lon,
    }
}
