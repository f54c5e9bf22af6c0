use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use services::error::AppError;
use tracing::error;

use crate::response::{ApiResponse, Empty};

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Authorization(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders an engine error as the standard error envelope.
pub fn error_response(err: AppError) -> Response {
    let status = status_for(&err);

    // Storage details stay in the log.
    let message = match &err {
        AppError::Database(e) => {
            error!(error = %e, "Database error while handling request");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };

    (
        status,
        Json(ApiResponse::<Empty>::error_with_code(message, err.code())),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error_response(AppError::validation(message))
}

/// Parses a `YYYY-MM-DD` day.
pub fn parse_day(raw: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| bad_request(format!("invalid day '{raw}', expected YYYY-MM-DD")))
}
