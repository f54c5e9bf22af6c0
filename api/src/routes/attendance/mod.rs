//! Check-in sessions and scanning, mounted at `/attendance`.
//!
//! - `POST /sessions` → start a session for an activity (assigned supervisor)
//! - `GET  /sessions/active` → the caller's live session and its scanned members
//! - `POST /sessions/{token}/close` → close a session (owner)
//! - `POST /scan` → scan into a session (enrolled member)

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::get_active_session;
pub use post::{close_session, scan, start_session};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/active", get(get_active_session))
        .route("/sessions/{token}/close", post(close_session))
        .route("/scan", post(scan))
}
