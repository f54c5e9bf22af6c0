use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveEnum, FromQueryResult, JoinType, PaginatorTrait, QueryOrder, QuerySelect, Statement,
};
use serde::Serialize;

use super::attendance_session::SessionStatus;

/// One member's check-in through a session (the session's scanned-set).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_session_scans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: i64,

    pub scanned_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::MemberId",
        to = "super::user::Column::Id"
    )]
    Member,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Outcome of [`Model::record_if_live`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanInsert {
    Recorded,
    AlreadyScanned,
    /// The session was closed or expired by the time of the write.
    SessionNotLive,
}

/// A scanned-set entry joined with the member's display name.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ScannedMember {
    pub member_id: i64,
    pub display_name: String,
    pub scanned_at: DateTime<Utc>,
}

impl Model {
    /// Add-if-absent insert into the scanned-set, guarded by the session.
    ///
    /// One statement both checks that the session is still `active` and inside
    /// its window at `now`, and inserts unless `(session_id, member_id)` is
    /// already present. A close or expiry that commits after the caller's own
    /// checks therefore still stops the scan. When nothing is inserted the
    /// reason is read back afterwards.
    pub async fn record_if_live<C>(
        db: &C,
        session_id: i64,
        member_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ScanInsert, DbErr>
    where
        C: ConnectionTrait,
    {
        let stmt = Statement::from_sql_and_values(
            db.get_database_backend(),
            r#"INSERT INTO attendance_session_scans (session_id, member_id, scanned_at)
SELECT ?, ?, ?
WHERE EXISTS (
    SELECT 1 FROM attendance_sessions
    WHERE id = ? AND status = ? AND expires_at > ?
)
ON CONFLICT (session_id, member_id) DO NOTHING"#,
            [
                session_id.into(),
                member_id.into(),
                now.into(),
                session_id.into(),
                SessionStatus::Active.to_value().into(),
                now.into(),
            ],
        );

        if db.execute(stmt).await?.rows_affected() == 1 {
            return Ok(ScanInsert::Recorded);
        }

        if Self::exists(db, session_id, member_id).await? {
            Ok(ScanInsert::AlreadyScanned)
        } else {
            Ok(ScanInsert::SessionNotLive)
        }
    }

    pub async fn exists<C>(db: &C, session_id: i64, member_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let found = Entity::find_by_id((session_id, member_id)).one(db).await?;
        Ok(found.is_some())
    }

    pub async fn count_for_session<C>(db: &C, session_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await
    }

    /// Scanned-set of a session in scan order.
    pub async fn list_for_session<C>(db: &C, session_id: i64) -> Result<Vec<ScannedMember>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::MemberId)
            .column(super::user::Column::DisplayName)
            .column(Column::ScannedAt)
            .join(JoinType::InnerJoin, Relation::Member.def())
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::ScannedAt)
            .order_by_asc(Column::MemberId)
            .into_model::<ScannedMember>()
            .all(db)
            .await
    }
}
