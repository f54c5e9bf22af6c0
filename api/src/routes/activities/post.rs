use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use services::attendance_bulk_service::{AttendanceBulkService, BulkEntry};
use util::state::AppState;

use crate::{
    auth::AuthUser,
    response::ApiResponse,
    routes::common::{error_response, parse_day},
};

#[derive(Debug, Deserialize)]
pub struct SubmitAttendanceReq {
    pub day: String,
    pub entries: Vec<BulkEntry>,
}

/// POST /api/activities/{activity_id}/attendance
///
/// Applies a roster of `{ member_id, status }` entries for `day`. Members who
/// already scanned in that day keep their scan record and are reported as
/// skipped.
///
/// ### Request Body
/// ```json
/// {
///   "day": "2026-04-14",
///   "entries": [
///     { "member_id": 12, "status": "Absent" },
///     { "member_id": 13, "status": "Late" }
///   ]
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ applied, skipped }`
/// - `400 Bad Request` for a malformed day or duplicate member ids
/// - `403 Forbidden` unless the caller is an administrator or the assigned supervisor
/// - `404 Not Found` for an unknown activity or member
pub async fn submit_attendance(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<SubmitAttendanceReq>,
) -> Response {
    let day = match parse_day(&body.day) {
        Ok(day) => day,
        Err(resp) => return resp,
    };

    match AttendanceBulkService::apply(
        state.db(),
        activity_id,
        day,
        &body.entries,
        claims.sub,
        Utc::now(),
    )
    .await
    {
        Ok(outcome) => {
            let message = format!(
                "Attendance saved: {} applied, {} skipped",
                outcome.applied, outcome.skipped
            );
            (StatusCode::OK, Json(ApiResponse::success(outcome, message))).into_response()
        }
        Err(e) => error_response(e),
    }
}
