pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod decode;
pub mod entities;
pub mod error;
pub mod ingest;
pub mod models;
pub mod store;
pub mod upsert;
