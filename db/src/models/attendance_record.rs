//! The attendance ledger: one row per `(activity, member, day)`.
//!
//! Every write goes through [`Model::upsert`], which folds the source-precedence
//! check into the same `INSERT ... ON CONFLICT DO UPDATE ... WHERE` statement as
//! the write itself. There is no read-then-write window for a competing writer
//! to slip into.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveEnum, FromQueryResult, Iterable, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: i64,
    /// UTC calendar day; the canonical key for "same day".
    #[sea_orm(primary_key, auto_increment = false)]
    pub day: NaiveDate,

    pub status: AttendanceStatus,
    pub source: AttendanceSource,
    pub recorded_by: i64,
    pub recorded_by_role: ActorRole,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "PascalCase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "late")]
    Late,

    #[sea_orm(string_value = "excused")]
    Excused,
}

/// Which write path produced a ledger row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "PascalCase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_source")]
#[strum(ascii_case_insensitive)]
pub enum AttendanceSource {
    #[sea_orm(string_value = "scan_in")]
    ScanIn,

    #[sea_orm(string_value = "bulk_submission")]
    BulkSubmission,

    #[sea_orm(string_value = "external_import")]
    ExternalImport,
}

impl AttendanceSource {
    /// Precedence rank; a higher rank is never overwritten by a lower one.
    pub fn rank(self) -> u8 {
        match self {
            AttendanceSource::ScanIn => 2,
            AttendanceSource::BulkSubmission | AttendanceSource::ExternalImport => 1,
        }
    }

    /// Stored sources that block a write from `self`.
    pub fn outranked_by(self) -> Vec<AttendanceSource> {
        AttendanceSource::iter()
            .filter(|other| other.rank() > self.rank())
            .collect()
    }
}

/// Role of the actor a ledger row is attributed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_actor_role")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActorRole {
    #[sea_orm(string_value = "administrator")]
    Administrator,

    #[sea_orm(string_value = "supervisor")]
    Supervisor,

    #[sea_orm(string_value = "member")]
    Member,

    #[sea_orm(string_value = "system")]
    System,
}

impl From<super::user::UserRole> for ActorRole {
    fn from(role: super::user::UserRole) -> Self {
        use super::user::UserRole;
        match role {
            UserRole::Administrator => ActorRole::Administrator,
            UserRole::Supervisor => ActorRole::Supervisor,
            UserRole::Member => ActorRole::Member,
        }
    }
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
        from = "Column::MemberId",
        to = "super::user::Column::Id"
    )]
    Member,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Normalizes an instant to its ledger day (UTC calendar date).
pub fn attendance_day(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// A single ledger write request.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub activity_id: i64,
    pub member_id: i64,
    pub day: NaiveDate,
    pub status: AttendanceStatus,
    pub source: AttendanceSource,
    pub recorded_by: i64,
    pub recorded_by_role: ActorRole,
}

/// Result of [`Model::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The row was inserted or overwritten.
    Applied,
    /// An existing row from a higher-precedence source was left untouched.
    Superseded,
}

/// Per-day aggregate for an activity.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub present: i64,
    pub absent: i64,
    pub total: i64,
}

/// Whole-activity aggregate.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct ActivityTotals {
    pub days: i64,
    pub entries: i64,
    pub present: i64,
}

fn count_status_sql(status: AttendanceStatus) -> String {
    format!(
        "COALESCE(SUM(CASE WHEN status = '{}' THEN 1 ELSE 0 END), 0)",
        status.to_value()
    )
}

impl Model {
    /// The sole ledger write primitive.
    ///
    /// Inserts the row, or overwrites the existing one for the same key unless
    /// its stored source outranks `entry.source`. Both the precedence test and
    /// the write happen in one statement. A blocked write is reported as
    /// [`UpsertOutcome::Superseded`], not as an error.
    pub async fn upsert<C>(
        db: &C,
        entry: LedgerEntry,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, DbErr>
    where
        C: ConnectionTrait,
    {
        let blocking = entry.source.outranked_by();

        let active_model = ActiveModel {
            activity_id: Set(entry.activity_id),
            member_id: Set(entry.member_id),
            day: Set(entry.day),
            status: Set(entry.status),
            source: Set(entry.source),
            recorded_by: Set(entry.recorded_by),
            recorded_by_role: Set(entry.recorded_by_role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let mut on_conflict =
            OnConflict::columns([Column::ActivityId, Column::MemberId, Column::Day]);
        on_conflict.update_columns([
            Column::Status,
            Column::Source,
            Column::RecordedBy,
            Column::RecordedByRole,
            Column::UpdatedAt,
        ]);
        if !blocking.is_empty() {
            on_conflict.action_and_where(
                Expr::col((Entity, Column::Source))
                    .is_not_in(blocking.iter().map(|s| s.to_value())),
            );
        }

        let affected = Entity::insert(active_model)
            .on_conflict(on_conflict)
            .exec_without_returning(db)
            .await?;

        if affected == 0 {
            tracing::debug!(
                activity_id = entry.activity_id,
                member_id = entry.member_id,
                day = %entry.day,
                source = %entry.source,
                "Ledger write superseded by higher-precedence record"
            );
            Ok(UpsertOutcome::Superseded)
        } else {
            Ok(UpsertOutcome::Applied)
        }
    }

    pub async fn find<C>(
        db: &C,
        activity_id: i64,
        member_id: i64,
        day: NaiveDate,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id((activity_id, member_id, day))
            .one(db)
            .await
    }

    /// All rows for `(activity, day)`, ordered by member.
    pub async fn for_day<C>(db: &C, activity_id: i64, day: NaiveDate) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .filter(Column::Day.eq(day))
            .order_by_asc(Column::MemberId)
            .all(db)
            .await
    }

    /// Member ids with a row from `source` for `(activity, day)`.
    pub async fn member_ids_with_source<C>(
        db: &C,
        activity_id: i64,
        day: NaiveDate,
        source: AttendanceSource,
    ) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::MemberId)
            .filter(Column::ActivityId.eq(activity_id))
            .filter(Column::Day.eq(day))
            .filter(Column::Source.eq(source))
            .into_tuple::<i64>()
            .all(db)
            .await
    }

    /// Per-day present/absent/total counts, most recent day first.
    pub async fn history<C>(
        db: &C,
        activity_id: i64,
        limit: u64,
    ) -> Result<Vec<DailySummary>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column(Column::Day)
            .column_as(Expr::cust(count_status_sql(AttendanceStatus::Present)), "present")
            .column_as(Expr::cust(count_status_sql(AttendanceStatus::Absent)), "absent")
            .column_as(Expr::cust("COUNT(*)"), "total")
            .filter(Column::ActivityId.eq(activity_id))
            .group_by(Column::Day)
            .order_by_desc(Column::Day)
            .limit(limit)
            .into_model::<DailySummary>()
            .all(db)
            .await
    }

    pub async fn totals_for_activity<C>(db: &C, activity_id: i64) -> Result<ActivityTotals, DbErr>
    where
        C: ConnectionTrait,
    {
        let totals = Entity::find()
            .select_only()
            .column_as(Expr::cust("COUNT(DISTINCT day)"), "days")
            .column_as(Expr::cust("COUNT(*)"), "entries")
            .column_as(Expr::cust(count_status_sql(AttendanceStatus::Present)), "present")
            .filter(Column::ActivityId.eq(activity_id))
            .into_model::<ActivityTotals>()
            .one(db)
            .await?;

        Ok(totals.unwrap_or(ActivityTotals {
            days: 0,
            entries: 0,
            present: 0,
        }))
    }

    /// Whether anything has been recorded for the activity on `day`.
    pub async fn exists_for_day<C>(db: &C, activity_id: i64, day: NaiveDate) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let found = Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .filter(Column::Day.eq(day))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// Every row for a member, newest day first.
    pub async fn for_member<C>(db: &C, member_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::MemberId.eq(member_id))
            .order_by_desc(Column::Day)
            .order_by_asc(Column::ActivityId)
            .all(db)
            .await
    }
}
