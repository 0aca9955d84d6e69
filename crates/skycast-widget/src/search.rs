//! Primary search: explicit city search or a picked suggestion, through to
//! the weather card. No cancellation here; requests run one after another.

use std::sync::Arc;

use skycast_weather::{ForecastSource, PlaceCandidate, PlaceLookup, WeatherError};
use tokio::sync::mpsc;

use crate::render::{RenderPort, WeatherView};

/// Work item for the weather card
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherRequest {
    /// Manual entry: geocode the name first, then fetch
    ByName(String),
    /// A picked suggestion already carries coordinates
    ByPlace(PlaceCandidate),
}

pub struct WeatherSearch<L, F> {
    lookup: Arc<L>,
    forecast: Arc<F>,
    render: Arc<dyn RenderPort>,
}

impl<L: PlaceLookup, F: ForecastSource> WeatherSearch<L, F> {
    pub fn new(lookup: Arc<L>, forecast: Arc<F>, render: Arc<dyn RenderPort>) -> Self {
        Self {
            lookup,
            forecast,
            render,
        }
    }

    /// Handle requests until every sender is gone.
    pub async fn run(self, mut requests: mpsc::UnboundedReceiver<WeatherRequest>) {
        while let Some(request) = requests.recv().await {
            self.handle(request).await;
        }
        tracing::debug!("Weather search stopped");
    }

    pub async fn handle(&self, request: WeatherRequest) {
        match request {
            WeatherRequest::ByName(city) => self.search(&city).await,
            WeatherRequest::ByPlace(place) => self.show_place(&place).await,
        }
    }

    /// Geocode `raw` (count 1) and show its weather. Blank input is ignored.
    pub async fn search(&self, raw: &str) {
        let city = raw.trim();
        if city.is_empty() {
            return;
        }

        self.begin();
        let result = match self.lookup.locate(city).await {
            Ok(place) => self.fetch(&place).await,
            Err(e) => Err(e),
        };
        self.finish(result);
    }

    pub async fn show_place(&self, place: &PlaceCandidate) {
        self.begin();
        let result = self.fetch(place).await;
        self.finish(result);
    }

    fn begin(&self) {
        self.render.hide_error();
        self.render.set_loading(true);
        self.render.hide_weather();
    }

    async fn fetch(&self, place: &PlaceCandidate) -> Result<WeatherView, WeatherError> {
        let current = self
            .forecast
            .current(place.latitude, place.longitude)
            .await?;

        tracing::info!("Weather for {} fetched", place.name);
        Ok(WeatherView::new(
            &place.name,
            place.country.as_deref(),
            &current,
            chrono::Local::now().date_naive(),
        ))
    }

    // Loading is cleared on every exit path.
    fn finish(&self, result: Result<WeatherView, WeatherError>) {
        match result {
            Ok(view) => self.render.show_weather(&view),
            Err(e) => {
                tracing::error!("Weather search failed: {}", e);
                self.render.show_error(&e.to_string());
            }
        }
        self.render.set_loading(false);
    }
}
