use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use services::attendance_record_service::AttendanceRecordService;
use util::state::AppState;

use crate::{
    auth::AuthUser,
    response::ApiResponse,
    routes::common::{error_response, parse_day},
};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub day: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

/// GET /api/activities/{activity_id}/attendance?day=YYYY-MM-DD
///
/// Lists the ledger rows for one day, ordered by member. `day` defaults to
/// today (UTC).
pub async fn get_attendance(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<DayQuery>,
) -> Response {
    let day = match query.day.as_deref() {
        Some(raw) => match parse_day(raw) {
            Ok(day) => day,
            Err(resp) => return resp,
        },
        None => Utc::now().date_naive(),
    };

    match AttendanceRecordService::for_day(state.db(), activity_id, day, claims.sub).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(records, "Attendance retrieved")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/activities/{activity_id}/attendance/history?limit=N
///
/// Per-day `{ day, present, absent, total }`, newest first. `limit`
/// defaults to 10 and must be between 1 and 365.
pub async fn get_attendance_history(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match AttendanceRecordService::history(state.db(), activity_id, query.limit, claims.sub).await {
        Ok(history) => (
            StatusCode::OK,
            Json(ApiResponse::success(history, "Attendance history retrieved")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/activities/{activity_id}/attendance/stats
pub async fn get_attendance_stats(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    let today = Utc::now().date_naive();
    match AttendanceRecordService::stats(state.db(), activity_id, claims.sub, today).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Attendance statistics retrieved")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
