use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveEnum, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::attendance_record::attendance_day;

/// A time-boxed check-in window opened by a supervisor for one activity.
///
/// `status` is only ever moved out of `Active`. The clock is authoritative for
/// expiry: a row can still read `Active` after `expires_at` until something
/// observes it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub activity_id: i64,
    pub owner_id: i64,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_session_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "closed")]
    Closed,

    #[sea_orm(string_value = "expired")]
    Expired,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity::Entity",
        from = "Column::ActivityId",
        to = "super::activity::Column::Id"
    )]
    Activity,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::attendance_session_scan::Entity")]
    Scans,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<super::attendance_session_scan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sessions cleared by [`Model::close_active_for_owner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Displaced {
    pub closed: u64,
    pub expired: u64,
}

impl Model {
    /// Inserts a new `Active` session expiring `ttl` after `now`.
    ///
    /// Callers must close the owner's previous active session first (see
    /// [`Model::close_active_for_owner`]); the partial unique index on
    /// `(owner_id) WHERE status = 'active'` rejects a second one.
    pub async fn create<C>(
        db: &C,
        activity_id: i64,
        owner_id: i64,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model = ActiveModel {
            token: Set(Uuid::new_v4().simple().to_string()),
            activity_id: Set(activity_id),
            owner_id: Set(owner_id),
            status: Set(SessionStatus::Active),
            created_at: Set(now),
            expires_at: Set(now + ttl),
            closed_at: Set(None),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_token<C>(db: &C, token: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find().filter(Column::Token.eq(token)).one(db).await
    }

    /// The owner's live session: stored as active *and* not yet past its expiry.
    pub async fn find_active_for_owner<C>(
        db: &C,
        owner_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::OwnerId.eq(owner_id))
            .filter(Column::Status.eq(SessionStatus::Active))
            .filter(Column::ExpiresAt.gt(now))
            .order_by_desc(Column::CreatedAt)
            .one(db)
            .await
    }

    /// Clears every session still stored as active for `owner_id`.
    ///
    /// Rows whose window has already lapsed at `now` become `Expired` (no
    /// `closed_at`); the rest become `Closed` at `now`.
    pub async fn close_active_for_owner<C>(
        db: &C,
        owner_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Displaced, DbErr>
    where
        C: ConnectionTrait,
    {
        let expired = Entity::update_many()
            .col_expr(Column::Status, Expr::value(SessionStatus::Expired.to_value()))
            .filter(Column::OwnerId.eq(owner_id))
            .filter(Column::Status.eq(SessionStatus::Active))
            .filter(Column::ExpiresAt.lte(now))
            .exec(db)
            .await?;

        let closed = Entity::update_many()
            .col_expr(Column::Status, Expr::value(SessionStatus::Closed.to_value()))
            .col_expr(Column::ClosedAt, Expr::value(Some(now)))
            .filter(Column::OwnerId.eq(owner_id))
            .filter(Column::Status.eq(SessionStatus::Active))
            .filter(Column::ExpiresAt.gt(now))
            .exec(db)
            .await?;

        Ok(Displaced {
            closed: closed.rows_affected,
            expired: expired.rows_affected,
        })
    }

    /// Moves one session from `Active` to `target`.
    ///
    /// The update is conditioned on the row still being active, so of two
    /// racing transitions exactly one reports `true`.
    async fn transition<C>(
        db: &C,
        session_id: i64,
        target: SessionStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(target.to_value()))
            .col_expr(Column::ClosedAt, Expr::value(closed_at))
            .filter(Column::Id.eq(session_id))
            .filter(Column::Status.eq(SessionStatus::Active))
            .exec(db)
            .await?;

        Ok(res.rows_affected == 1)
    }

    pub async fn close<C>(db: &C, session_id: i64, now: DateTime<Utc>) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Self::transition(db, session_id, SessionStatus::Closed, Some(now)).await
    }

    pub async fn mark_expired<C>(db: &C, session_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Self::transition(db, session_id, SessionStatus::Expired, None).await
    }

    /// Housekeeping sweep: flips every active session past its expiry to `Expired`.
    pub async fn expire_stale<C>(db: &C, now: DateTime<Utc>) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(SessionStatus::Expired.to_value()))
            .filter(Column::Status.eq(SessionStatus::Active))
            .filter(Column::ExpiresAt.lte(now))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The ledger day scans through this session are recorded against.
    pub fn attendance_day(&self) -> NaiveDate {
        attendance_day(self.created_at)
    }
}
