use chrono::{DateTime, NaiveDate, Utc};
use db::models::{
    activity,
    attendance_record::{self, ActorRole, AttendanceSource, AttendanceStatus, LedgerEntry},
    attendance_session::{self, SessionStatus},
    attendance_session_scan::{self, ScanInsert},
    enrollment, user,
};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;
use tracing::{info, warn};

use crate::access;
use crate::error::{AppError, AppResult, ConflictKind, ForbiddenKind, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReceipt {
    pub activity_id: i64,
    pub activity_name: String,
    pub day: NaiveDate,
}

pub struct AttendanceScanService;

impl AttendanceScanService {
    /// Marks `member_id` present through the session behind `token`.
    ///
    /// Checks run in a fixed order and the first failure is returned. The
    /// scanned-set insert and the ledger write share one transaction, and the
    /// scanned-set insert is add-if-absent, so a member racing themselves
    /// produces exactly one success.
    pub async fn scan(
        db: &DatabaseConnection,
        token: &str,
        member_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<ScanReceipt> {
        let member = user::Model::find_member(db, member_id)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::MemberProfile))?;

        let session = attendance_session::Model::find_by_token(db, token)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::InvalidToken))?;

        match session.status {
            SessionStatus::Closed => return Err(AppError::Conflict(ConflictKind::SessionClosed)),
            SessionStatus::Expired => return Err(AppError::Conflict(ConflictKind::SessionExpired)),
            SessionStatus::Active => {}
        }

        if session.is_expired_at(now) {
            attendance_session::Model::mark_expired(db, session.id).await?;
            info!(session_id = session.id, "Attendance session expired on scan");
            return Err(AppError::Conflict(ConflictKind::SessionExpired));
        }

        if attendance_session_scan::Model::exists(db, session.id, member.id).await? {
            return Err(AppError::Conflict(ConflictKind::DuplicateScan));
        }

        if !enrollment::Model::is_enrolled(db, session.activity_id, member.id).await? {
            warn!(session_id = session.id, member_id = member.id, "Scan by non-enrolled member");
            return Err(AppError::Forbidden(ForbiddenKind::NotEnrolled));
        }

        let activity = access::load_activity(db, session.activity_id).await?;

        Self::record(db, &session, activity, member.id, now).await
    }

    /// Writes a scan for a session that passed the checks in [`Self::scan`].
    ///
    /// The scanned-set insert re-checks the session in the same statement, so
    /// a close or expiry that committed after those checks still wins.
    async fn record(
        db: &DatabaseConnection,
        session: &attendance_session::Model,
        activity: activity::Model,
        member_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<ScanReceipt> {
        let day = session.attendance_day();

        let txn = db.begin().await?;
        match attendance_session_scan::Model::record_if_live(&txn, session.id, member_id, now).await? {
            ScanInsert::Recorded => {}
            ScanInsert::AlreadyScanned => {
                txn.rollback().await?;
                return Err(AppError::Conflict(ConflictKind::DuplicateScan));
            }
            ScanInsert::SessionNotLive => {
                txn.rollback().await?;
                warn!(session_id = session.id, member_id, "Session ended before scan was written");
                return Err(Self::ended(db, session.id).await?);
            }
        }
        attendance_record::Model::upsert(
            &txn,
            LedgerEntry {
                activity_id: activity.id,
                member_id,
                day,
                status: AttendanceStatus::Present,
                source: AttendanceSource::ScanIn,
                recorded_by: session.owner_id,
                recorded_by_role: ActorRole::Supervisor,
            },
            now,
        )
        .await?;
        txn.commit().await?;

        info!(
            session_id = session.id,
            activity_id = activity.id,
            member_id,
            %day,
            "Member scanned in"
        );

        Ok(ScanReceipt {
            activity_id: activity.id,
            activity_name: activity.name,
            day,
        })
    }

    /// The conflict to report for a session that is no longer accepting scans.
    /// A row still stored as active has lapsed and is moved to `Expired`.
    async fn ended(db: &DatabaseConnection, session_id: i64) -> AppResult<AppError> {
        let stored = attendance_session::Entity::find_by_id(session_id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::InvalidToken))?;

        let kind = match stored.status {
            SessionStatus::Closed => ConflictKind::SessionClosed,
            SessionStatus::Expired => ConflictKind::SessionExpired,
            SessionStatus::Active => {
                attendance_session::Model::mark_expired(db, session_id).await?;
                ConflictKind::SessionExpired
            }
        };
        Ok(AppError::Conflict(kind))
    }
}
