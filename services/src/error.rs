use sea_orm::DbErr;
use strum::IntoStaticStr;

/// Result type for attendance engine operations
pub type AppResult<T> = Result<T, AppError>;

/// What a `NotFound` failure was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum NotFoundKind {
    /// No session carries the presented token.
    InvalidToken,
    /// The scanning user has no member profile.
    MemberProfile,
    #[strum(serialize = "ActivityNotFound")]
    Activity,
    #[strum(serialize = "MemberNotFound")]
    Member,
}

/// Why a write was refused because of the current state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum ConflictKind {
    SessionClosed,
    SessionExpired,
    DuplicateScan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum ForbiddenKind {
    NotEnrolled,
}

/// Errors that can occur in the attendance engine
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{}", not_found_message(.0))]
    NotFound(NotFoundKind),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("{}", conflict_message(.0))]
    Conflict(ConflictKind),

    #[error("{}", forbidden_message(.0))]
    Forbidden(ForbiddenKind),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        AppError::Authorization(reason.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        AppError::Validation(reason.into())
    }

    /// Machine-readable error code carried in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::NotFound(kind) => kind.into(),
            AppError::Authorization(_) => "Unauthorized",
            AppError::Conflict(kind) => kind.into(),
            AppError::Forbidden(kind) => kind.into(),
            AppError::Database(_) => "DatabaseError",
        }
    }
}

fn not_found_message(kind: &NotFoundKind) -> &'static str {
    match kind {
        NotFoundKind::InvalidToken => "Invalid or unknown session token",
        NotFoundKind::MemberProfile => "Member profile not found",
        NotFoundKind::Activity => "Activity not found",
        NotFoundKind::Member => "One or more members not found",
    }
}

fn conflict_message(kind: &ConflictKind) -> &'static str {
    match kind {
        ConflictKind::SessionClosed => "Session is closed",
        ConflictKind::SessionExpired => "Session has expired",
        ConflictKind::DuplicateScan => "Attendance already marked for this session",
    }
}

fn forbidden_message(kind: &ForbiddenKind) -> &'static str {
    match kind {
        ForbiddenKind::NotEnrolled => "You are not enrolled in this activity",
    }
}
