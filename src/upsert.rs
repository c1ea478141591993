//! Identity-keyed batch upserts.
//!
//! Each entity is written on its own, keyed by its external id, so replaying
//! a batch converges on the same stored state. The first failed write aborts
//! the batch; writes that already landed stay in place.

use serde::Serialize;
use tracing::trace;

use crate::{
    error::{StoreError, StoreResult},
    models::{Cinema, Event, Film, Identified},
    store::{Document, DocumentStore, UpsertResult},
};

pub const CINEMAS: &str = "cinemas";
pub const FILMS: &str = "films";
pub const EVENTS: &str = "events";

pub async fn upsert_many<S, T>(store: &S, collection: &str, items: &[T]) -> StoreResult<UpsertResult>
where
    S: DocumentStore + ?Sized,
    T: Identified + Serialize,
{
    let mut total = UpsertResult::default();

    for item in items {
        let id = item.id();
        if id.is_empty() {
            return Err(StoreError::MissingId { collection: collection.to_string() });
        }

        let fields = to_document(collection, item)?;
        let res = store.upsert_by_id(collection, id, fields).await?;
        trace!(collection = %collection, id = %id, ?res, "upserted");
        total += res;
    }

    Ok(total)
}

fn to_document<T: Serialize>(collection: &str, item: &T) -> StoreResult<Document> {
    let serialize_err = |reason: String| StoreError::Serialize {
        collection: collection.to_string(),
        reason,
    };

    match serde_json::to_value(item).map_err(|e| serialize_err(e.to_string()))? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(serialize_err(format!("expected an object, got {other}"))),
    }
}

pub async fn upsert_cinemas<S: DocumentStore + ?Sized>(
    store: &S,
    cinemas: &[Cinema],
) -> StoreResult<UpsertResult> {
    upsert_many(store, CINEMAS, cinemas).await
}

pub async fn upsert_films<S: DocumentStore + ?Sized>(
    store: &S,
    films: &[Film],
) -> StoreResult<UpsertResult> {
    upsert_many(store, FILMS, films).await
}

pub async fn upsert_events<S: DocumentStore + ?Sized>(
    store: &S,
    events: &[Event],
) -> StoreResult<UpsertResult> {
    upsert_many(store, EVENTS, events).await
}
