//! View state of the weather screen and the reducer that transitions it.
//!
//! `reduce` is pure: it takes the current state and one event, and returns
//! the next state plus the effects the driver must perform. Every load cycle
//! gets a new `generation`; responses tagged with an older one are dropped,
//! so a slow reply for a previous city can never overwrite a newer one.

use crate::{
    condition::{Condition, Gradient, STATUS_GRADIENT},
    model::{CurrentWeather, DEFAULT_CITY, ForecastPoint, Suggestion},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Error,
    Ready(CurrentWeather),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub city: String,
    pub generation: u64,
    pub phase: Phase,
    pub forecast: Vec<ForecastPoint>,
    pub search: SearchState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

impl ViewState {
    pub fn new(city: &str) -> Self {
        Self {
            city: city.to_string(),
            generation: 0,
            phase: Phase::Loading,
            forecast: Vec::new(),
            search: SearchState::default(),
        }
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        match &self.phase {
            Phase::Ready(current) => Some(current),
            _ => None,
        }
    }

    /// Forecast strip to draw. Empty unless the screen is ready.
    pub fn visible_forecast(&self) -> &[ForecastPoint] {
        match self.phase {
            Phase::Ready(_) => self.forecast.as_slice(),
            _ => &[],
        }
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.current().map(|c| &c.condition)
    }

    pub fn gradient(&self) -> Gradient {
        self.condition().map_or(STATUS_GRADIENT, Condition::gradient)
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.condition().map(Condition::icon)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The screen appeared with the city read from storage (or the default).
    Mounted { city: String },
    /// The user picked a city.
    CitySelected { city: String },
    CurrentLoaded {
        generation: u64,
        current: Option<CurrentWeather>,
    },
    ForecastLoaded {
        generation: u64,
        points: Vec<ForecastPoint>,
    },
    SearchOpened,
    SearchClosed,
    QueryChanged { query: String },
    SuggestionsLoaded {
        query: String,
        suggestions: Vec<Suggestion>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCurrent { city: String, generation: u64 },
    FetchForecast { city: String, generation: u64 },
    FetchSuggestions { query: String },
    PersistCity { city: String },
}

pub fn reduce(state: ViewState, event: Event) -> (ViewState, Vec<Effect>) {
    match event {
        Event::Mounted { city } => start_loading(state, city),

        Event::CitySelected { city } => {
            let state = ViewState {
                search: SearchState::default(),
                ..state
            };
            let persist = Effect::PersistCity { city: city.clone() };
            let (state, mut effects) = start_loading(state, city);
            effects.insert(0, persist);
            (state, effects)
        }

        Event::CurrentLoaded { generation, current } => {
            if generation != state.generation {
                tracing::debug!(
                    generation,
                    latest = state.generation,
                    "Discarding stale current weather"
                );
                return (state, Vec::new());
            }
            let phase = match current {
                Some(current) => Phase::Ready(current),
                None => Phase::Error,
            };
            (ViewState { phase, ..state }, Vec::new())
        }

        Event::ForecastLoaded { generation, points } => {
            if generation != state.generation {
                tracing::debug!(generation, latest = state.generation, "Discarding stale forecast");
                return (state, Vec::new());
            }
            let state = ViewState {
                forecast: points,
                ..state
            };
            (state, Vec::new())
        }

        Event::SearchOpened => {
            let search = SearchState {
                active: true,
                ..state.search.clone()
            };
            (ViewState { search, ..state }, Vec::new())
        }

        Event::SearchClosed => (
            ViewState {
                search: SearchState::default(),
                ..state
            },
            Vec::new(),
        ),

        Event::QueryChanged { query } => {
            if query.trim().is_empty() {
                let search = SearchState {
                    active: state.search.active,
                    query,
                    suggestions: Vec::new(),
                };
                return (ViewState { search, ..state }, Vec::new());
            }

            let effects = vec![Effect::FetchSuggestions {
                query: query.clone(),
            }];
            let search = SearchState {
                query,
                ..state.search.clone()
            };
            (ViewState { search, ..state }, effects)
        }

        Event::SuggestionsLoaded { query, suggestions } => {
            if query != state.search.query {
                tracing::debug!(%query, "Discarding suggestions for outdated query");
                return (state, Vec::new());
            }
            let search = SearchState {
                suggestions,
                ..state.search.clone()
            };
            (ViewState { search, ..state }, Vec::new())
        }
    }
}

fn start_loading(state: ViewState, city: String) -> (ViewState, Vec<Effect>) {
    let generation = state.generation + 1;
    let effects = vec![
        Effect::FetchCurrent {
            city: city.clone(),
            generation,
        },
        Effect::FetchForecast {
            city: city.clone(),
            generation,
        },
    ];

    let state = ViewState {
        city,
        generation,
        phase: Phase::Loading,
        forecast: Vec::new(),
        ..state
    };
    (state, effects)
}
