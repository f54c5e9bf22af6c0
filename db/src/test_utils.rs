use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory database with the full schema applied.
///
/// The pool is pinned to one long-lived connection because every SQLite
/// `:memory:` connection is a separate database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory sqlite");

    Migrator::up(&db, None)
        .await
        .expect("Failed to apply migrations");

    db
}
