use tracing::debug;

use crate::{
    client::DataClient,
    decode,
    error::IngestResult,
    models::{Cinema, Repertoire},
};

/// Where the quickbook data API lives and which slice of it to ask for.
#[derive(Clone, Debug)]
pub struct Endpoints {
    /// Up to and including the tenant segment, e.g. `.../quickbook/10103`.
    pub base_url: String,
    /// Upper bound of the date range the API is asked about.
    pub until: String,
    pub lang: String,
    /// Cinema whose schedule defines the list of dates.
    pub reference_cinema_id: String,
}

impl Endpoints {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn cinemas_url(&self) -> String {
        format!(
            "{}/cinemas/with-event/until/{}?attr=&lang={}",
            self.base(),
            urlencoding::encode(&self.until),
            self.lang
        )
    }

    pub fn dates_url(&self) -> String {
        format!(
            "{}/dates/in-cinema/{}/until/{}?attr=&lang={}",
            self.base(),
            urlencoding::encode(&self.reference_cinema_id),
            urlencoding::encode(&self.until),
            self.lang
        )
    }

    pub fn events_url(&self, cinema_id: &str, date: &str) -> String {
        format!(
            "{}/film-events/in-cinema/{}/at-date/{}?attr=&lang={}",
            self.base(),
            urlencoding::encode(cinema_id),
            urlencoding::encode(date),
            self.lang
        )
    }
}

pub struct CinemaCityApi<C> {
    client: C,
    endpoints: Endpoints,
}

impl<C: DataClient> CinemaCityApi<C> {
    pub fn new(client: C, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn fetch_cinemas(&self) -> IngestResult<Vec<Cinema>> {
        let body = self.client.fetch(&self.endpoints.cinemas_url()).await?;
        let cinemas = decode::decode_cinemas(&body)?;
        debug!(count = cinemas.len(), "decoded cinemas");
        Ok(cinemas)
    }

    pub async fn fetch_dates(&self) -> IngestResult<Vec<String>> {
        let body = self.client.fetch(&self.endpoints.dates_url()).await?;
        let dates = decode::decode_dates(&body)?;
        debug!(count = dates.len(), "decoded dates");
        Ok(dates)
    }

    pub async fn fetch_repertoire(&self, cinema: &Cinema, date: &str) -> IngestResult<Repertoire> {
        let url = self.endpoints.events_url(&cinema.id, date);
        let body = self.client.fetch(&url).await?;
        let rep = decode::decode_repertoire(&body)?;
        debug!(
            cinema = %cinema.name,
            date = %date,
            films = rep.films.len(),
            events = rep.events.len(),
            "decoded repertoire"
        );
        Ok(rep)
    }
}
