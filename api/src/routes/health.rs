use crate::response::{ApiResponse, Empty};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::error;
use util::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Liveness plus a database round trip.
///
/// ### Responses
/// - `200 OK` with `{ "status": "OK", "database": "up" }`
/// - `503 Service Unavailable` when the database does not answer
async fn health_check(State(state): State<AppState>) -> Response {
    match state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Health {
                    status: "OK",
                    database: "up",
                },
                "Health check passed",
            )),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<Empty>::error_with_code(
                    "Database unavailable",
                    "DatabaseError",
                )),
            )
                .into_response()
        }
    }
}
