//! Lookup session state machine.
//!
//! ```text
//! Idle -> Loading -> Success | Error -> Loading (new search) | Idle (reset)
//! ```
//!
//! Every search is issued a [`Ticket`] carrying a monotonically increasing
//! token. Only the result for the latest ticket may change the state; older
//! results are dropped.

use chrono::Datelike;
use tracing::debug;

use crate::{
    display::{Background, UnitPreference, WeatherView},
    error::FetchError,
    model::{OriginalReadings, WeatherSnapshot},
};

/// A snapshot together with the readings and background derived at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub snapshot: WeatherSnapshot,
    pub readings: OriginalReadings,
    pub background: Background,
}

impl Loaded {
    pub fn new(snapshot: WeatherSnapshot) -> Self {
        let readings = OriginalReadings::from(&snapshot);
        let background = Background::select(snapshot.condition, readings.temperature_c);
        Self {
            snapshot,
            readings,
            background,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Success(Loaded),
    Error(FetchError),
}

/// Handle for one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    token: u64,
    city: String,
}

impl Ticket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// What applying a fetch result did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Success,
    Failed,
    /// A newer search or a reset superseded this ticket.
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    query: String,
    state: SessionState,
    searched: bool,
    unit: UnitPreference,
    latest_token: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn has_searched(&self) -> bool {
        self.searched
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        match &self.state {
            SessionState::Success(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn background(&self) -> Option<Background> {
        self.loaded().map(|loaded| loaded.background)
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Commit the current query. The query text is cleared once a search
    /// is actually issued.
    pub fn submit_query(&mut self) -> Option<Ticket> {
        let city = self.query.trim().to_string();
        let ticket = self.begin_search(&city)?;
        self.query.clear();
        Some(ticket)
    }

    /// Enter Loading for `city`. Blank input is ignored.
    pub fn begin_search(&mut self, city: &str) -> Option<Ticket> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        self.latest_token += 1;
        self.state = SessionState::Loading;
        self.searched = true;

        debug!(token = self.latest_token, city, "search started");

        Some(Ticket {
            token: self.latest_token,
            city: city.to_string(),
        })
    }

    pub fn apply(
        &mut self,
        ticket: &Ticket,
        result: Result<WeatherSnapshot, FetchError>,
    ) -> Applied {
        if ticket.token != self.latest_token || !self.is_loading() {
            debug!(
                token = ticket.token,
                latest = self.latest_token,
                "discarding stale result"
            );
            return Applied::Stale;
        }

        match result {
            Ok(snapshot) => {
                self.state = SessionState::Success(Loaded::new(snapshot));
                Applied::Success
            }
            Err(err) => {
                self.state = SessionState::Error(err);
                Applied::Failed
            }
        }
    }

    /// Back to Idle from anywhere. In-flight results are invalidated.
    pub fn reset(&mut self) {
        self.query.clear();
        self.state = SessionState::Idle;
        self.searched = false;
        self.unit = UnitPreference::Metric;
        self.latest_token += 1;
    }

    pub fn toggle_unit(&mut self) -> UnitPreference {
        self.unit = self.unit.toggled();
        self.unit
    }

    /// The error worth showing: hidden before the first search and while loading.
    pub fn visible_error(&self) -> Option<&FetchError> {
        match &self.state {
            SessionState::Error(err) if self.searched => Some(err),
            _ => None,
        }
    }

    pub fn view<D: Datelike>(&self, today: &D, icon_host: &str) -> Option<WeatherView> {
        self.loaded().map(|loaded| {
            WeatherView::derive(
                &loaded.snapshot,
                &loaded.readings,
                loaded.background,
                self.unit,
                today,
                icon_host,
            )
        })
    }
}
