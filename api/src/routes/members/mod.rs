use axum::{Router, routing::get};
use util::state::AppState;

mod get;

pub use get::get_member_attendance;

/// Builds the `/members` route group.
pub fn members_routes() -> Router<AppState> {
    Router::new().route("/{member_id}/attendance", get(get_member_attendance))
}
