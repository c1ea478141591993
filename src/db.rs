use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tracing::debug;

pub async fn connect_and_migrate(
    database_url: &str,
    connect_timeout: Duration,
) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url);
    opts.connect_timeout(connect_timeout).acquire_timeout(connect_timeout).sqlx_logging(false);
    // Every pooled connection to an in-memory SQLite database sees its own database.
    if database_url.contains(":memory:") {
        opts.max_connections(1);
    }

    let db = Database::connect(opts).await?;

    if database_url.starts_with("sqlite") {
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    debug!("database schema up to date");
    Ok(db)
}
