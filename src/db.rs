use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens a connection pool. An in-memory SQLite database only lives as long
/// as its connection, so those pools are pinned to a single connection.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if database_url.starts_with("sqlite::memory:") {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(24 * 60 * 60));
    } else {
        options.max_connections(10);
    }

    Database::connect(options).await
}

/// Opens the pool and applies every pending migration.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
