//! Debounced, cancellable city autocomplete.
//!
//! Keystrokes arrive as [`WidgetEvent`]s. After a quiet interval the trimmed
//! text becomes a query; issuing a query first cancels whatever request is
//! still in flight, and every settlement is checked against the id of the
//! request currently held. A superseded request can therefore never touch
//! the suggestion panel, whichever order the responses come back in.

use std::sync::Arc;
use std::time::Duration;

use skycast_core::AutocompleteConfig;
use skycast_weather::{PlaceCandidate, PlaceLookup, WeatherError};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::render::{DiagnosticSink, RenderPort};
use crate::search::WeatherRequest;

/// Raw UI events the controller subscribes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Current value of the input field after a keystroke
    Input(String),
    /// Click outside the input group
    Dismiss,
    /// Pick the suggestion at this position of the visible list
    Select(usize),
    /// Enter key or search button with the current field value
    Submit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteState {
    Idle,
    Debouncing,
    Fetching,
    Displaying,
}

#[derive(Debug, Clone)]
pub struct AutocompleteSettings {
    pub debounce: Duration,
    pub min_chars: usize,
    pub max_results: usize,
    /// Leave an already visible list in place when a lookup fails
    pub keep_on_error: bool,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self::from(&AutocompleteConfig::default())
    }
}

impl From<&AutocompleteConfig> for AutocompleteSettings {
    fn from(config: &AutocompleteConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_chars: config.min_chars,
            max_results: config.max_suggestions,
            keep_on_error: config.keep_suggestions_on_error,
        }
    }
}

/// The one in-flight lookup
#[derive(Debug)]
struct PendingRequest {
    id: u64,
    cancel: CancellationToken,
}

/// Outcome of a lookup task, delivered back to the controller loop
#[derive(Debug)]
struct Settled {
    id: u64,
    query: String,
    result: Result<Vec<PlaceCandidate>, WeatherError>,
}

pub struct AutocompleteController<L> {
    lookup: Arc<L>,
    render: Arc<dyn RenderPort>,
    diagnostics: Arc<dyn DiagnosticSink>,
    requests: mpsc::UnboundedSender<WeatherRequest>,
    settings: AutocompleteSettings,

    state: AutocompleteState,
    input: Option<String>,
    deadline: Option<Instant>,
    pending: Option<PendingRequest>,
    suggestions: Vec<PlaceCandidate>,
    next_id: u64,

    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
}

impl<L: PlaceLookup> AutocompleteController<L> {
    pub fn new(
        lookup: Arc<L>,
        render: Arc<dyn RenderPort>,
        diagnostics: Arc<dyn DiagnosticSink>,
        requests: mpsc::UnboundedSender<WeatherRequest>,
        settings: AutocompleteSettings,
    ) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            render,
            diagnostics,
            requests,
            settings,
            state: AutocompleteState::Idle,
            input: None,
            deadline: None,
            pending: None,
            suggestions: Vec::new(),
            next_id: 0,
            settled_tx,
            settled_rx,
        }
    }

    pub fn state(&self) -> AutocompleteState {
        self.state
    }

    /// The list currently on screen, empty when hidden.
    pub fn suggestions(&self) -> &[PlaceCandidate] {
        &self.suggestions
    }

    /// Process events until the stream closes, then cancel any pending lookup.
    pub async fn run(mut self, mut events: mpsc::Receiver<WidgetEvent>) {
        tracing::debug!("Autocomplete controller started");

        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;
                Some(settled) = self.settled_rx.recv() => self.on_settled(settled),
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_debounce();
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }

        self.cancel_pending();
        tracing::debug!("Autocomplete controller stopped");
    }

    pub fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Input(text) => self.on_input(text),
            WidgetEvent::Dismiss => self.on_dismiss(),
            WidgetEvent::Select(index) => self.select(index),
            WidgetEvent::Submit(text) => self.on_submit(&text),
        }
    }

    /// Restart the debounce window with the latest field value.
    pub fn on_input(&mut self, raw_text: impl Into<String>) {
        self.input = Some(raw_text.into());
        self.deadline = Some(Instant::now() + self.settings.debounce);
        self.state = self.resting_state();
    }

    /// Debounce window elapsed: act on the last input seen.
    pub fn fire_debounce(&mut self) {
        self.deadline = None;
        let Some(raw) = self.input.take() else {
            return;
        };

        self.cancel_pending();

        let query = raw.trim();
        if query.chars().count() < self.settings.min_chars {
            self.clear_suggestions();
            self.state = AutocompleteState::Idle;
            return;
        }

        self.issue(query.to_string());
    }

    fn issue(&mut self, query: String) {
        self.next_id += 1;
        let id = self.next_id;
        let cancel = CancellationToken::new();

        tracing::debug!("Issuing suggestion lookup #{} for {:?}", id, query);

        let lookup = Arc::clone(&self.lookup);
        let settled_tx = self.settled_tx.clone();
        let token = cancel.clone();
        let max_results = self.settings.max_results;
        tokio::spawn(async move {
            let result = lookup.suggest(&query, max_results, &token).await;
            let _ = settled_tx.send(Settled { id, query, result });
        });

        self.pending = Some(PendingRequest { id, cancel });
        self.state = AutocompleteState::Fetching;
    }

    // Every write to the pending slot goes through here first.
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            tracing::debug!("Cancelled suggestion lookup #{}", pending.id);
        }
    }

    fn on_settled(&mut self, settled: Settled) {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.id == settled.id);
        if !is_current {
            tracing::debug!(
                "Discarding superseded lookup #{} for {:?}",
                settled.id,
                settled.query
            );
            return;
        }
        self.pending = None;

        match settled.result {
            Ok(candidates) if candidates.is_empty() => {
                self.clear_suggestions();
                self.state = self.resting_state();
            }
            Ok(candidates) => {
                let labels: Vec<String> = candidates.iter().map(PlaceCandidate::label).collect();
                self.render.show_suggestions(&labels);
                self.suggestions = candidates;
                self.state = if self.is_debouncing() {
                    AutocompleteState::Debouncing
                } else {
                    AutocompleteState::Displaying
                };
            }
            Err(e) if e.is_cancelled() => {
                self.state = self.resting_state();
            }
            Err(e) => {
                self.diagnostics.report(&settled.query, &e);
                if self.settings.keep_on_error && !self.suggestions.is_empty() {
                    self.state = if self.is_debouncing() {
                        AutocompleteState::Debouncing
                    } else {
                        AutocompleteState::Displaying
                    };
                } else {
                    self.clear_suggestions();
                    self.state = self.resting_state();
                }
            }
        }
    }

    /// Hide the list. A pending lookup keeps running and may show a list
    /// again when it settles.
    pub fn on_dismiss(&mut self) {
        self.clear_suggestions();
        self.state = self.resting_state();
    }

    /// Pick an entry of the visible list by position.
    pub fn select(&mut self, index: usize) {
        match self.suggestions.get(index).cloned() {
            Some(candidate) => self.on_candidate_selected(candidate),
            None => tracing::debug!(
                "Ignoring selection {} of {} suggestions",
                index,
                self.suggestions.len()
            ),
        }
    }

    /// Hide the list and hand the candidate to the weather fetch.
    pub fn on_candidate_selected(&mut self, candidate: PlaceCandidate) {
        self.clear_suggestions();
        self.state = self.resting_state();
        tracing::info!("Selected {}", candidate.label());
        self.forward(WeatherRequest::ByPlace(candidate));
    }

    /// Explicit search for the typed text.
    pub fn on_submit(&mut self, raw_text: &str) {
        self.clear_suggestions();
        self.state = self.resting_state();

        let city = raw_text.trim();
        if city.is_empty() {
            return;
        }
        self.forward(WeatherRequest::ByName(city.to_string()));
    }

    fn forward(&self, request: WeatherRequest) {
        if self.requests.send(request).is_err() {
            tracing::warn!("Weather search has stopped; request dropped");
        }
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.render.hide_suggestions();
    }

    // Short input keeps the window armed so the fire still cancels and
    // hides, but does not count as debouncing.
    fn is_debouncing(&self) -> bool {
        self.deadline.is_some()
            && self
                .input
                .as_deref()
                .is_some_and(|raw| raw.trim().chars().count() >= self.settings.min_chars)
    }

    fn resting_state(&self) -> AutocompleteState {
        if self.is_debouncing() {
            AutocompleteState::Debouncing
        } else if self.pending.is_some() {
            AutocompleteState::Fetching
        } else {
            AutocompleteState::Idle
        }
    }
}
