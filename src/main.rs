use cinema_sync::{
    api::CinemaCityApi, client::HttpDataClient, config::Config, ingest::Ingestor, store::DbStore,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinema_sync=debug,sqlx=warn".to_string()),
        )
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "ingestion aborted");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let http = HttpDataClient::new(config.http_timeout)?;
    let api = CinemaCityApi::new(http, config.endpoints.clone());

    let store = DbStore::connect(&config.database_url, config.db_connect_timeout).await?;
    info!(database_url = %config.database_url, "connected to document store");

    let result = Ingestor::new(&api, &store, &config.cinemas).run().await;

    // Release the store before reporting, whichever way the run went.
    if let Err(err) = store.close().await {
        warn!(error = %err, "failed to close document store");
    }

    let summary = result?;
    info!(
        cinemas = summary.cinemas.written(),
        repertoires = summary.repertoires,
        films_inserted = summary.films.inserted,
        films_modified = summary.films.modified,
        events_inserted = summary.events.inserted,
        events_modified = summary.events.modified,
        "ingestion finished"
    );
    Ok(())
}
