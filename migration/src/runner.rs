use colored::*;
use futures::FutureExt;
use migration::Migrator;
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::{MigrationStatus, prelude::*};
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

/// Applies every pending migration one at a time, printing a status line each.
///
/// Already-applied migrations are tracked in `seaql_migrations` and skipped,
/// so running against an up-to-date database is a no-op.
pub async fn apply_pending(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?;
    if pending.is_empty() {
        println!("{}", "Schema is up to date".dimmed());
        return Ok(0);
    }

    println!("Applying {} migration(s)...", pending.len());
    for migration in &pending {
        let label = format!("  {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
        print!("{label}{dots} ");
        io::stdout().flush().ok();

        let start = Instant::now();
        let result = std::panic::AssertUnwindSafe(Migrator::up(db, Some(1)))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(())) => {
                let took = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {took}", "done".green());
            }
            Ok(Err(err)) => {
                println!("{}", "failed".red());
                return Err(err);
            }
            Err(_) => {
                println!("{}", "panicked".red());
                return Err(DbErr::Migration(format!(
                    "migration {} panicked",
                    migration.name()
                )));
            }
        }
    }

    Ok(pending.len())
}

/// Prints every known migration with its applied/pending state.
pub async fn print_status(db: &DatabaseConnection) -> Result<(), DbErr> {
    for migration in Migrator::get_migration_with_status(db).await? {
        let state = match migration.status() {
            MigrationStatus::Applied => "applied".green(),
            MigrationStatus::Pending => "pending".yellow(),
        };
        println!("{state:>8}  {}", migration.name());
    }
    Ok(())
}
