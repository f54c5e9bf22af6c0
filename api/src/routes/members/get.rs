use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::attendance_record_service::AttendanceRecordService;
use util::state::AppState;

use crate::{auth::AuthUser, response::ApiResponse, routes::common::error_response};

/// GET /api/members/{member_id}/attendance
///
/// Per-activity attendance for a member with the raw records, newest first.
/// Members may only read their own; supervisors only see activities they
/// are assigned to.
pub async fn get_member_attendance(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match AttendanceRecordService::member_summary(state.db(), member_id, claims.sub).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ApiResponse::success(summary, "Member attendance retrieved")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
