#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use async_trait::async_trait;
use cinema_sync::{api::Endpoints, client::DataClient, error::FetchError};

pub const BASE_URL: &str = "https://api.test/quickbook/10103";

pub fn endpoints() -> Endpoints {
    Endpoints {
        base_url: BASE_URL.to_string(),
        until: "3000-06-06".to_string(),
        lang: "pl_PL".to_string(),
        reference_cinema_id: "1097".to_string(),
    }
}

pub fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// Serves fixture payloads by URL shape and records every requested URL.
#[derive(Default)]
pub struct FixtureClient {
    pub requests: Mutex<Vec<String>>,
    /// Replaces the events payload when set.
    pub events_override: Option<Vec<u8>>,
}

impl FixtureClient {
    pub fn with_events(payload: &[u8]) -> Self {
        Self { events_override: Some(payload.to_vec()), ..Self::default() }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataClient for FixtureClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if url.contains("/dates/") {
            Ok(fixture("dates.json"))
        } else if url.contains("/cinemas/") {
            Ok(fixture("cinemas.json"))
        } else if url.contains("/film-events/") {
            Ok(self.events_override.clone().unwrap_or_else(|| fixture("events.json")))
        } else {
            Err(FetchError::Status { url: url.to_string(), status: 404 })
        }
    }
}
