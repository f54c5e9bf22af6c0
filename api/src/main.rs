use api::auth::middleware::log_request;
use api::routes::routes;
use axum::{Router, http::header::CONTENT_TYPE, middleware::from_fn};
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use services::attendance_session_service::AttendanceSessionService;
use std::{net::SocketAddr, time::Duration};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_appender::rolling;
use util::{config, state::AppState};

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, path = %config::database_path(), "Failed to open database");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        error!(error = %e, "Failed to apply migrations");
        std::process::exit(1);
    }

    let app_state = AppState::new(db);

    spawn_session_sweeper(app_state.clone());

    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_TYPE]);

    let app = Router::new()
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    info!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

/// Periodically moves lapsed sessions to `Expired`. Expiry is already
/// enforced on every read, so this only keeps stored statuses tidy.
fn spawn_session_sweeper(app_state: AppState) {
    let every = config::session_sweep_seconds();
    if every == 0 {
        info!("Session sweep disabled");
        return;
    }

    let db = app_state.db_clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(every));
        loop {
            interval.tick().await;
            if let Err(e) = AttendanceSessionService::sweep_expired(&db, Utc::now()).await {
                error!(error = %e, "Session sweep failed");
            }
        }
    });
}
