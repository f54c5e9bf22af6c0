use chrono::{DateTime, Duration, Utc};
use db::models::{
    attendance_session::{self, SessionStatus},
    attendance_session_scan::{self, ScannedMember},
};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};
use util::config;

use crate::access;
use crate::error::{AppError, AppResult, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub activity_id: i64,
    pub activity_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedSession {
    pub status: SessionStatus,
    pub scanned_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSessionDetails {
    pub token: String,
    pub activity_id: i64,
    pub activity_name: String,
    pub expires_at: DateTime<Utc>,
    pub scanned_count: usize,
    pub scanned_members: Vec<ScannedMember>,
}

/// `{ "active": false }` or `{ "active": true, ...details }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSessionView {
    pub active: bool,
    #[serde(flatten)]
    pub session: Option<ActiveSessionDetails>,
}

pub struct AttendanceSessionService;

impl AttendanceSessionService {
    /// Opens a check-in window for `activity_id`.
    ///
    /// Any session the supervisor still has stored as active is cleared in the
    /// same transaction (closed, or expired if its window already lapsed), so
    /// the supervisor never holds two.
    pub async fn start(
        db: &DatabaseConnection,
        supervisor_id: i64,
        activity_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<StartedSession> {
        let (_, activity) = access::assigned_supervisor(db, supervisor_id, activity_id).await?;
        let ttl = Duration::minutes(config::session_ttl_minutes());

        let txn = db.begin().await?;
        let displaced =
            attendance_session::Model::close_active_for_owner(&txn, supervisor_id, now).await?;
        let session =
            attendance_session::Model::create(&txn, activity.id, supervisor_id, now, ttl).await?;
        txn.commit().await?;

        info!(
            session_id = session.id,
            activity_id = activity.id,
            supervisor_id,
            closed_previous = displaced.closed,
            expired_previous = displaced.expired,
            expires_at = %session.expires_at,
            "Attendance session started"
        );

        Ok(StartedSession {
            token: session.token,
            expires_at: session.expires_at,
            activity_id: activity.id,
            activity_name: activity.name,
        })
    }

    /// Closes the session behind `token`. Closing a session that is already
    /// terminal leaves it unchanged; one whose window has lapsed is recorded as
    /// expired rather than closed.
    pub async fn close(
        db: &DatabaseConnection,
        token: &str,
        supervisor_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<ClosedSession> {
        let session = attendance_session::Model::find_by_token(db, token)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::InvalidToken))?;

        if session.owner_id != supervisor_id {
            warn!(session_id = session.id, supervisor_id, "Close attempted by non-owner");
            return Err(AppError::unauthorized("only the session owner can close it"));
        }

        let mut status = session.status;
        if status == SessionStatus::Active {
            if session.is_expired_at(now) {
                if attendance_session::Model::mark_expired(db, session.id).await? {
                    status = SessionStatus::Expired;
                }
            } else if attendance_session::Model::close(db, session.id, now).await? {
                status = SessionStatus::Closed;
            }

            // Lost a race with another transition; report what is stored.
            if status == SessionStatus::Active {
                status = Self::reload_status(db, session.id).await?;
            }
        }

        let scanned_count =
            attendance_session_scan::Model::count_for_session(db, session.id).await?;
        info!(session_id = session.id, %status, scanned_count, "Attendance session closed");

        Ok(ClosedSession {
            status,
            scanned_count,
        })
    }

    /// The supervisor's live session with its scanned-set, if any.
    pub async fn active(
        db: &DatabaseConnection,
        supervisor_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<ActiveSessionView> {
        let Some(session) =
            attendance_session::Model::find_active_for_owner(db, supervisor_id, now).await?
        else {
            debug!(supervisor_id, "No live attendance session");
            return Ok(ActiveSessionView {
                active: false,
                session: None,
            });
        };

        let activity = access::load_activity(db, session.activity_id).await?;
        let scanned_members =
            attendance_session_scan::Model::list_for_session(db, session.id).await?;

        Ok(ActiveSessionView {
            active: true,
            session: Some(ActiveSessionDetails {
                token: session.token,
                activity_id: activity.id,
                activity_name: activity.name,
                expires_at: session.expires_at,
                scanned_count: scanned_members.len(),
                scanned_members,
            }),
        })
    }

    /// Housekeeping: marks lapsed active sessions as expired.
    pub async fn sweep_expired(db: &DatabaseConnection, now: DateTime<Utc>) -> AppResult<u64> {
        let expired = attendance_session::Model::expire_stale(db, now).await?;
        if expired > 0 {
            info!(expired, "Expired stale attendance sessions");
        }
        Ok(expired)
    }

    async fn reload_status(db: &DatabaseConnection, session_id: i64) -> AppResult<SessionStatus> {
        let stored = attendance_session::Entity::find_by_id(session_id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::InvalidToken))?;
        Ok(stored.status)
    }
}
