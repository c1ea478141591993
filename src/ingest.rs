use std::collections::HashSet;

use tracing::{debug, info};

use crate::{
    api::CinemaCityApi,
    client::DataClient,
    error::IngestResult,
    models::Cinema,
    store::{DocumentStore, UpsertResult},
    upsert,
};

pub const DEFAULT_CINEMA: &str = "Wrocław - Wroclavia";

/// Chooses which cinemas get their repertoire fetched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CinemaFilter {
    All,
    /// Exact display names.
    Names(HashSet<String>),
    Ids(HashSet<String>),
}

impl Default for CinemaFilter {
    fn default() -> Self {
        Self::Names([DEFAULT_CINEMA.to_string()].into_iter().collect())
    }
}

impl CinemaFilter {
    pub fn accepts(&self, cinema: &Cinema) -> bool {
        match self {
            Self::All => true,
            Self::Names(names) => names.contains(&cinema.name),
            Self::Ids(ids) => ids.contains(&cinema.id),
        }
    }
}

/// Counter totals for one complete run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub cinemas: UpsertResult,
    pub films: UpsertResult,
    pub events: UpsertResult,
    /// Number of (cinema, date) repertoires fetched.
    pub repertoires: usize,
}

pub struct Ingestor<'a, C, S: ?Sized> {
    api: &'a CinemaCityApi<C>,
    store: &'a S,
    filter: &'a CinemaFilter,
}

impl<'a, C, S> Ingestor<'a, C, S>
where
    C: DataClient,
    S: DocumentStore + ?Sized,
{
    pub fn new(api: &'a CinemaCityApi<C>, store: &'a S, filter: &'a CinemaFilter) -> Self {
        Self { api, store, filter }
    }

    /// Fetches reference data, then every selected cinema's repertoire for
    /// every date, upserting as it goes. Stops at the first error.
    pub async fn run(&self) -> IngestResult<RunSummary> {
        let mut summary = RunSummary::default();

        let cinemas = self.api.fetch_cinemas().await?;
        let dates = self.api.fetch_dates().await?;

        summary.cinemas = upsert::upsert_cinemas(self.store, &cinemas).await?;
        info!(
            collection = upsert::CINEMAS,
            matched = summary.cinemas.matched,
            modified = summary.cinemas.modified,
            inserted = summary.cinemas.inserted,
            "cinemas upserted"
        );

        let selected: Vec<&Cinema> = cinemas.iter().filter(|c| self.filter.accepts(c)).collect();
        debug!(selected = selected.len(), dates = dates.len(), "fetching repertoires");

        for date in &dates {
            for cinema in &selected {
                let (films, events) = self.sync_repertoire(cinema, date).await?;
                summary.films += films;
                summary.events += events;
                summary.repertoires += 1;
            }
        }

        Ok(summary)
    }

    async fn sync_repertoire(
        &self,
        cinema: &Cinema,
        date: &str,
    ) -> IngestResult<(UpsertResult, UpsertResult)> {
        info!(cinema = %cinema.name, date = %date, "fetching repertoire");
        let rep = self.api.fetch_repertoire(cinema, date).await?;

        let films = upsert::upsert_films(self.store, &rep.films).await?;
        info!(
            collection = upsert::FILMS,
            cinema = %cinema.name,
            date = %date,
            matched = films.matched,
            modified = films.modified,
            inserted = films.inserted,
            "films upserted"
        );

        let events = upsert::upsert_events(self.store, &rep.events).await?;
        info!(
            collection = upsert::EVENTS,
            cinema = %cinema.name,
            date = %date,
            matched = events.matched,
            modified = events.modified,
            inserted = events.inserted,
            "events upserted"
        );

        Ok((films, events))
    }
}
