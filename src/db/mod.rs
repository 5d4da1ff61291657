//! Database connection and schema management

pub mod migration;

use crate::config::DatabaseConfig;
use crate::error::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub use migration::Migrator;

/// Open a connection pool and apply migrations when configured to
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    tracing::info!(backend = ?db.get_database_backend(), "Connected to database");

    if config.run_migrations {
        migrate(&db).await?;
    }
    Ok(db)
}

/// Apply all pending migrations
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
