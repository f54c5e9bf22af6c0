use std::{fs, path::Path, process};
use util::config;

mod runner;

/// `migration [up|fresh|clean|status]`, defaulting to `up`.
#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".into());

    match command.as_str() {
        "clean" => remove_db_file(&db_path),
        "fresh" => {
            remove_db_file(&db_path);
            migrate(&db_path).await;
        }
        "status" => {
            let db = open(&db_path).await;
            if let Err(err) = runner::print_status(&db).await {
                eprintln!("Could not read migration status: {err}");
                process::exit(1);
            }
        }
        "up" => migrate(&db_path).await,
        other => {
            eprintln!("Unknown command '{other}'. Expected one of: up, fresh, clean, status");
            process::exit(2);
        }
    }
}

async fn migrate(db_path: &str) {
    let db = open(db_path).await;
    if let Err(err) = runner::apply_pending(&db).await {
        eprintln!("Migration failed: {err}");
        process::exit(1);
    }
}

async fn open(db_path: &str) -> sea_orm::DatabaseConnection {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok();
        }
    }

    let url = format!("sqlite://{db_path}?mode=rwc");
    match sea_orm::Database::connect(&url).await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Could not open {db_path}: {err}");
            process::exit(1);
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if !db_path.exists() {
        println!("Nothing to remove at {}", db_path.display());
        return;
    }

    match fs::remove_file(db_path) {
        Ok(()) => println!("Removed {}", db_path.display()),
        Err(err) => {
            eprintln!("Could not remove {}: {err}", db_path.display());
            process::exit(1);
        }
    }
}
