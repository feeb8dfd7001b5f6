//! Controller tying the session, the provider and the last-city store together.

use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    display::{UnitPreference, WeatherView},
    error::FetchError,
    model::WeatherSnapshot,
    provider::WeatherProvider,
    session::{Applied, Session, Ticket},
    store::LastCityStore,
};

/// A search that has been issued but not yet performed.
///
/// [`PendingFetch::run`] owns everything it needs, so it can be spawned.
#[derive(Debug)]
pub struct PendingFetch {
    ticket: Ticket,
    provider: Arc<dyn WeatherProvider>,
}

impl PendingFetch {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub async fn run(self) -> CompletedFetch {
        let result = self.provider.current_weather(self.ticket.city()).await;
        CompletedFetch {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct CompletedFetch {
    pub ticket: Ticket,
    pub result: Result<WeatherSnapshot, FetchError>,
}

#[derive(Debug)]
pub struct WeatherApp<S: LastCityStore> {
    session: Session,
    provider: Arc<dyn WeatherProvider>,
    store: S,
    icon_host: String,
}

impl<S: LastCityStore> WeatherApp<S> {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: S, icon_host: impl Into<String>) -> Self {
        Self {
            session: Session::new(),
            provider,
            store,
            icon_host: icon_host.into(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replay the persisted city, if there is one.
    pub fn startup(&mut self) -> Option<PendingFetch> {
        let city = match self.store.read_last_city() {
            Ok(city) => city?,
            Err(err) => {
                warn!(error = %err, "could not read last city");
                return None;
            }
        };

        info!(city = %city, "replaying last city");
        self.search(&city)
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.session.set_query(text);
    }

    /// Commit the current query.
    pub fn submit(&mut self) -> Option<PendingFetch> {
        let ticket = self.session.submit_query()?;
        Some(self.pending(ticket))
    }

    pub fn search(&mut self, city: &str) -> Option<PendingFetch> {
        let ticket = self.session.begin_search(city)?;
        Some(self.pending(ticket))
    }

    fn pending(&self, ticket: Ticket) -> PendingFetch {
        PendingFetch {
            ticket,
            provider: Arc::clone(&self.provider),
        }
    }

    /// Apply a finished fetch. The city is persisted on success only.
    pub fn complete(&mut self, done: CompletedFetch) -> Applied {
        let applied = self.session.apply(&done.ticket, done.result);

        if applied == Applied::Success {
            if let Err(err) = self.store.record_last_city(done.ticket.city()) {
                warn!(error = %err, "could not persist last city");
            }
        }

        applied
    }

    /// Issue, run and apply one search.
    ///
    /// Returns `None` when the input is blank and nothing was issued.
    pub async fn lookup(&mut self, city: &str) -> Option<Applied> {
        let pending = self.search(city)?;
        let done = pending.run().await;
        Some(self.complete(done))
    }

    pub fn toggle_unit(&mut self) -> UnitPreference {
        self.session.toggle_unit()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Derived view for the current date.
    pub fn view(&self) -> Option<WeatherView> {
        self.session
            .view(&Local::now().date_naive(), &self.icon_host)
    }
}
