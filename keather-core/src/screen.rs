use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;

use crate::{provider::WeatherProvider, store::PreferenceStore};

mod state;

pub use state::{Effect, Event, Phase, SearchState, ViewState, reduce};

/// Drives a [`ViewState`]: feeds events through [`reduce`] and performs the
/// effects it asks for against the provider and the preference store.
#[derive(Debug)]
pub struct Screen {
    provider: Box<dyn WeatherProvider>,
    store: Arc<dyn PreferenceStore>,
    default_city: String,
    state: ViewState,
}

impl Screen {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        store: Arc<dyn PreferenceStore>,
        default_city: &str,
    ) -> Self {
        Self {
            provider,
            store,
            default_city: default_city.to_string(),
            state: ViewState::new(default_city),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Restore the saved city (or the default) and run the first load cycle.
    pub async fn mount(&mut self) {
        let city = self.saved_city();
        tracing::info!(%city, "Mounting weather screen");
        self.dispatch(Event::Mounted { city }).await;
    }

    /// Run the first load cycle for `city` instead of the saved one. The
    /// store is not read; `city` is persisted as if it had been selected.
    pub async fn mount_with(&mut self, city: &str) {
        tracing::info!(%city, "Mounting weather screen");
        self.dispatch(Event::CitySelected {
            city: city.to_string(),
        })
        .await;
    }

    /// Persist `city` and reload the screen for it.
    pub async fn select(&mut self, city: &str) {
        tracing::info!(%city, "City selected");
        self.dispatch(Event::CitySelected {
            city: city.to_string(),
        })
        .await;
    }

    pub async fn open_search(&mut self) {
        self.dispatch(Event::SearchOpened).await;
    }

    pub async fn close_search(&mut self) {
        self.dispatch(Event::SearchClosed).await;
    }

    /// Update the search text and refresh suggestions for it.
    pub async fn search(&mut self, query: &str) {
        self.dispatch(Event::QueryChanged {
            query: query.to_string(),
        })
        .await;
    }

    /// Apply `event` and every event produced by the resulting effects until
    /// the screen settles.
    pub async fn dispatch(&mut self, event: Event) {
        self.dispatch_observed(event, |_| {}).await;
    }

    /// Like [`Screen::dispatch`], calling `observe` after every transition.
    ///
    /// Effects run concurrently and each follow-up event is applied as soon
    /// as its effect completes, so a slow forecast never holds back the
    /// current conditions.
    pub async fn dispatch_observed(&mut self, event: Event, mut observe: impl FnMut(&ViewState)) {
        let provider: &dyn WeatherProvider = self.provider.as_ref();
        let store: &dyn PreferenceStore = self.store.as_ref();
        let state = &mut self.state;

        let mut in_flight = FuturesUnordered::new();
        let mut next = Some(event);
        loop {
            if let Some(event) = next.take() {
                let (reduced, effects) = reduce(std::mem::take(state), event);
                *state = reduced;
                observe(state);
                in_flight.extend(
                    effects
                        .into_iter()
                        .map(|effect| perform(provider, store, effect)),
                );
            }

            match in_flight.next().await {
                Some(follow_up) => next = follow_up,
                None => break,
            }
        }
    }

    fn saved_city(&self) -> String {
        match self.store.load() {
            Ok(Some(city)) if !city.trim().is_empty() => city,
            Ok(_) => self.default_city.clone(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load saved city; using default");
                self.default_city.clone()
            }
        }
    }
}

async fn perform(
    provider: &dyn WeatherProvider,
    store: &dyn PreferenceStore,
    effect: Effect,
) -> Option<Event> {
    match effect {
        Effect::FetchCurrent { city, generation } => {
            let current = match provider.current_weather(&city).await {
                Ok(current) => Some(current),
                Err(err) => {
                    tracing::warn!(%city, error = %err, "Failed to fetch current weather");
                    None
                }
            };
            Some(Event::CurrentLoaded {
                generation,
                current,
            })
        }

        Effect::FetchForecast { city, generation } => {
            let points = provider.daily_forecast(&city).await.unwrap_or_else(|err| {
                tracing::warn!(%city, error = %err, "Failed to fetch daily forecast");
                Vec::new()
            });
            Some(Event::ForecastLoaded { generation, points })
        }

        Effect::FetchSuggestions { query } => {
            let suggestions = provider
                .city_suggestions(&query)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(%query, error = %err, "Failed to fetch city suggestions");
                    Vec::new()
                });
            Some(Event::SuggestionsLoaded { query, suggestions })
        }

        Effect::PersistCity { city } => {
            if let Err(err) = store.save(&city) {
                tracing::warn!(%city, error = %err, "Failed to save city");
            }
            None
        }
    }
}
