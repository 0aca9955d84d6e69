//! Runtime wiring: one task for the autocomplete controller, one for the
//! weather search, and a handle that feeds UI events in.

use std::sync::Arc;

use skycast_core::Config;
use skycast_weather::{
    ForecastSource, GeoSuggestClient, PlaceLookup, WeatherError, WeatherProvider,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::autocomplete::{AutocompleteController, AutocompleteSettings, WidgetEvent};
use crate::render::{DiagnosticSink, RenderPort, TracingDiagnostics};
use crate::search::WeatherSearch;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Widget has shut down")]
    Closed,
}

impl<T> From<mpsc::error::SendError<T>> for WidgetError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        WidgetError::Closed
    }
}

/// Entry point for building a running widget.
pub struct WeatherWidget;

impl WeatherWidget {
    /// Spawn the widget against the Open-Meteo endpoints from `config`.
    /// Must be called from within a tokio runtime.
    pub fn from_config(
        config: &Config,
        render: Arc<dyn RenderPort>,
    ) -> Result<WidgetHandle, WeatherError> {
        let endpoints = &config.endpoints;
        let lookup = GeoSuggestClient::new(
            &endpoints.geocoding_url,
            &endpoints.language,
            endpoints.request_timeout(),
        )?;
        let forecast = WeatherProvider::new(&endpoints.forecast_url, endpoints.request_timeout())?;

        Ok(Self::spawn(
            lookup,
            forecast,
            render,
            Arc::new(TracingDiagnostics),
            AutocompleteSettings::from(&config.autocomplete),
        ))
    }

    pub fn spawn<L, F>(
        lookup: L,
        forecast: F,
        render: Arc<dyn RenderPort>,
        diagnostics: Arc<dyn DiagnosticSink>,
        settings: AutocompleteSettings,
    ) -> WidgetHandle
    where
        L: PlaceLookup,
        F: ForecastSource,
    {
        let lookup = Arc::new(lookup);
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();

        let search = WeatherSearch::new(Arc::clone(&lookup), Arc::new(forecast), Arc::clone(&render));
        let controller =
            AutocompleteController::new(lookup, render, diagnostics, requests_tx, settings);

        let controller_task = tokio::spawn(controller.run(events_rx));
        let search_task = tokio::spawn(search.run(requests_rx));

        tracing::info!("Weather widget started");

        WidgetHandle {
            events: events_tx,
            controller_task,
            search_task,
        }
    }
}

/// Feeds UI events into a running widget.
pub struct WidgetHandle {
    events: mpsc::Sender<WidgetEvent>,
    controller_task: JoinHandle<()>,
    search_task: JoinHandle<()>,
}

impl WidgetHandle {
    pub async fn input(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetEvent::Input(text.into())).await
    }

    pub async fn dismiss(&self) -> Result<(), WidgetError> {
        self.send(WidgetEvent::Dismiss).await
    }

    pub async fn select(&self, index: usize) -> Result<(), WidgetError> {
        self.send(WidgetEvent::Select(index)).await
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetEvent::Submit(text.into())).await
    }

    pub async fn send(&self, event: WidgetEvent) -> Result<(), WidgetError> {
        self.events.send(event).await?;
        Ok(())
    }

    /// Close the event stream and wait for both tasks to finish. A weather
    /// search already underway completes first.
    pub async fn shutdown(self) {
        drop(self.events);
        if let Err(e) = self.controller_task.await {
            tracing::error!("Autocomplete task ended abnormally: {}", e);
        }
        if let Err(e) = self.search_task.await {
            tracing::error!("Weather search task ended abnormally: {}", e);
        }
        tracing::info!("Weather widget stopped");
    }
}
