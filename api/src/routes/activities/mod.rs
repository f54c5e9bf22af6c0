//! Ledger access per activity, mounted at `/activities`.
//!
//! - `POST /{activity_id}/attendance` → bulk roster submission
//! - `GET  /{activity_id}/attendance?day=YYYY-MM-DD` → records for a day
//! - `GET  /{activity_id}/attendance/history?limit=N` → per-day summary
//! - `GET  /{activity_id}/attendance/stats` → activity statistics

use axum::{Router, routing::get};
use util::state::AppState;

mod get;
mod post;

pub use get::{get_attendance, get_attendance_history, get_attendance_stats};
pub use post::submit_attendance;

pub fn activities_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{activity_id}/attendance",
            get(get_attendance).post(submit_attendance),
        )
        .route("/{activity_id}/attendance/history", get(get_attendance_history))
        .route("/{activity_id}/attendance/stats", get(get_attendance_stats))
}
