//! Unwrapping of the API's `{"body": {...}}` envelopes into entities.
//!
//! Every response nests its payload one level deep under `body`. Decoding is
//! strict: malformed JSON, a missing `body`, or a missing list inside it are
//! all errors, never an empty result.

use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::DecodeError,
    models::{Cinema, Repertoire},
};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    body: T,
}

#[derive(Debug, Deserialize)]
struct CinemasBody {
    cinemas: Vec<Cinema>,
}

#[derive(Debug, Deserialize)]
struct DatesBody {
    dates: Vec<String>,
}

fn unwrap_body<T: DeserializeOwned>(
    bytes: &[u8],
    envelope: &'static str,
) -> Result<T, DecodeError> {
    serde_json::from_slice::<Envelope<T>>(bytes)
        .map(|e| e.body)
        .map_err(|source| DecodeError { envelope, source })
}

pub fn decode_cinemas(bytes: &[u8]) -> Result<Vec<Cinema>, DecodeError> {
    unwrap_body::<CinemasBody>(bytes, "cinema list").map(|b| b.cinemas)
}

/// Dates are kept as the opaque strings the API returns.
pub fn decode_dates(bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
    unwrap_body::<DatesBody>(bytes, "date list").map(|b| b.dates)
}

pub fn decode_repertoire(bytes: &[u8]) -> Result<Repertoire, DecodeError> {
    unwrap_body(bytes, "film events")
}
