use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use services::{
    attendance_scan_service::AttendanceScanService,
    attendance_session_service::AttendanceSessionService,
};
use util::state::AppState;

use crate::{
    auth::AuthUser,
    response::ApiResponse,
    routes::common::{bad_request, error_response},
};

#[derive(Debug, Deserialize)]
pub struct StartSessionReq {
    pub activity_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ScanReq {
    pub token: String,
}

/// POST /api/attendance/sessions
///
/// Starts a check-in session for `activity_id`. Any other session the caller
/// still has open is closed first.
///
/// ### Responses
/// - `201 Created` with `{ token, expires_at, activity_id, activity_name }`
/// - `403 Forbidden` if the caller is not the activity's assigned supervisor
/// - `404 Not Found` if the activity does not exist
pub async fn start_session(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<StartSessionReq>,
) -> Response {
    match AttendanceSessionService::start(state.db(), claims.sub, body.activity_id, Utc::now()).await
    {
        Ok(started) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(started, "Attendance session started")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/attendance/sessions/{token}/close
///
/// ### Responses
/// - `200 OK` with `{ status, scanned_count }`
/// - `403 Forbidden` if the caller does not own the session
/// - `404 Not Found` (`InvalidToken`) for an unknown token
pub async fn close_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match AttendanceSessionService::close(state.db(), &token, claims.sub, Utc::now()).await {
        Ok(closed) => (
            StatusCode::OK,
            Json(ApiResponse::success(closed, "Attendance session closed")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/attendance/scan
///
/// Marks the caller present through the session identified by `token`.
///
/// ### Responses
/// - `200 OK` with `{ activity_id, activity_name, day }`
/// - `404 Not Found` (`MemberProfile`, `InvalidToken`)
/// - `409 Conflict` (`SessionClosed`, `SessionExpired`, `DuplicateScan`)
/// - `403 Forbidden` (`NotEnrolled`)
pub async fn scan(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<ScanReq>,
) -> Response {
    if body.token.trim().is_empty() {
        return bad_request("token is required");
    }

    match AttendanceScanService::scan(state.db(), body.token.trim(), claims.sub, Utc::now()).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(ApiResponse::success(receipt, "Attendance marked")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
