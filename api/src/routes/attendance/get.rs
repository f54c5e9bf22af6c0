use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use services::attendance_session_service::AttendanceSessionService;
use util::state::AppState;

use crate::{auth::AuthUser, response::ApiResponse, routes::common::error_response};

/// GET /api/attendance/sessions/active
///
/// Returns the caller's live session, re-evaluating expiry on every read.
///
/// ### Responses
/// - `200 OK` with `{ "active": false }` when nothing is live, or
///   `{ "active": true, "token", "activity_id", "activity_name", "expires_at",
///   "scanned_count", "scanned_members": [...] }`
pub async fn get_active_session(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match AttendanceSessionService::active(state.db(), claims.sub, Utc::now()).await {
        Ok(view) => {
            let message = if view.active {
                "Active session retrieved"
            } else {
                "No active session"
            };
            (StatusCode::OK, Json(ApiResponse::success(view, message))).into_response()
        }
        Err(e) => error_response(e),
    }
}
