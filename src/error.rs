use thiserror::Error;

/// Failure to retrieve a payload from the remote API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] wreq::Error),
}

/// The payload was not the JSON envelope it was expected to be.
#[derive(Debug, Error)]
#[error("failed to decode {envelope} response: {source}")]
pub struct DecodeError {
    pub envelope: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// A write against the document store was rejected.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("entity in {collection} did not serialize to a document: {reason}")]
    Serialize { collection: String, reason: String },

    #[error("entity in {collection} has an empty identifier")]
    MissingId { collection: String },

    #[error("stored document {collection}/{id} is corrupt: {source}")]
    Corrupt {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type IngestResult<T> = Result<T, IngestError>;
pub type StoreResult<T> = Result<T, StoreError>;
