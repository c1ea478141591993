use serde::{Deserialize, Deserializer, Serialize};

/// Anything that can be written to the store under a stable external id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Reads an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

// Entities deserialize from the API's wire names and serialize to the stored
// document layout, where the identifier becomes the `_id` primary key.

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Cinema {
    #[serde(rename(serialize = "_id"))]
    pub id: String,
    #[serde(
        rename(deserialize = "displayName"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub name: String,
}

impl Identified for Cinema {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    #[serde(rename(serialize = "_id", deserialize = "id"))]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Runtime in minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub length: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_year: String,
}

impl Identified for Film {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A single showtime of a film in a cinema.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename(serialize = "_id", deserialize = "id"))]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub film_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cinema_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub business_day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_date_time: String,
    #[serde(
        rename(deserialize = "attributeIds", serialize = "attributes"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub attributes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_link: String,
    #[serde(
        rename(deserialize = "auditoriumTinyName", serialize = "auditorium"),
        alias = "AuditoriumTinyName",
        default,
        deserialize_with = "null_as_default"
    )]
    pub auditorium: String,
}

impl Identified for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Films and showtimes of one cinema on one business day.
#[derive(Clone, Debug, Deserialize)]
pub struct Repertoire {
    pub films: Vec<Film>,
    pub events: Vec<Event>,
}
