use std::collections::BTreeMap;

use chrono::NaiveDate;
use db::models::{
    activity,
    attendance_record::{self, AttendanceStatus, DailySummary},
    enrollment,
    user::{self, UserRole},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use strum::Display;
use tracing::warn;

use crate::access;
use crate::error::{AppError, AppResult, NotFoundKind};

pub use db::models::attendance_record::Model as AttendanceRecord;

pub const DEFAULT_HISTORY_LIMIT: u64 = 10;
pub const MAX_HISTORY_LIMIT: u64 = 365;

/// Attendance percentage at or above which a member is in good standing.
const SAFE_THRESHOLD: f64 = 75.0;
const WARNING_THRESHOLD: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Standing {
    Safe,
    Warning,
    Critical,
}

impl Standing {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= SAFE_THRESHOLD {
            Standing::Safe
        } else if pct >= WARNING_THRESHOLD {
            Standing::Warning
        } else {
            Standing::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityAttendance {
    pub activity_id: i64,
    pub activity_code: String,
    pub activity_name: String,
    pub present: u64,
    pub total: u64,
    pub percentage: f64,
    pub standing: Standing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAttendance {
    pub member_id: i64,
    pub overall_percentage: f64,
    pub activities: Vec<ActivityAttendance>,
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityStats {
    pub activity_id: i64,
    pub enrolled: u64,
    pub days_recorded: u64,
    pub total_entries: u64,
    pub present_entries: u64,
    pub average_attendance: f64,
    pub marked_today: bool,
}

/// `part / whole` as a percentage rounded to one decimal place; zero when
/// there is nothing to divide by.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    ((part as f64 / whole as f64) * 1000.0).round() / 10.0
}

pub struct AttendanceRecordService;

impl AttendanceRecordService {
    /// All ledger rows for one activity day.
    pub async fn for_day(
        db: &DatabaseConnection,
        activity_id: i64,
        day: NaiveDate,
        caller_id: i64,
    ) -> AppResult<Vec<AttendanceRecord>> {
        access::activity_staff(db, caller_id, activity_id).await?;
        Ok(attendance_record::Model::for_day(db, activity_id, day).await?)
    }

    /// Per-day counts, most recent first. `limit` defaults to
    /// [`DEFAULT_HISTORY_LIMIT`] and must lie in `1..=MAX_HISTORY_LIMIT`.
    pub async fn history(
        db: &DatabaseConnection,
        activity_id: i64,
        limit: Option<u64>,
        caller_id: i64,
    ) -> AppResult<Vec<DailySummary>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {MAX_HISTORY_LIMIT}"
            )));
        }

        access::activity_staff(db, caller_id, activity_id).await?;
        Ok(attendance_record::Model::history(db, activity_id, limit).await?)
    }

    /// Whether anything is recorded for the activity on `day`.
    pub async fn is_marked(
        db: &DatabaseConnection,
        activity_id: i64,
        day: NaiveDate,
    ) -> AppResult<bool> {
        Ok(attendance_record::Model::exists_for_day(db, activity_id, day).await?)
    }

    pub async fn stats(
        db: &DatabaseConnection,
        activity_id: i64,
        caller_id: i64,
        today: NaiveDate,
    ) -> AppResult<ActivityStats> {
        let (_, activity) = access::activity_staff(db, caller_id, activity_id).await?;

        let enrolled = enrollment::Model::count_for_activity(db, activity.id).await?;
        let totals = attendance_record::Model::totals_for_activity(db, activity.id).await?;
        let marked_today = Self::is_marked(db, activity.id, today).await?;

        let total_entries = totals.entries.max(0) as u64;
        let present_entries = totals.present.max(0) as u64;

        Ok(ActivityStats {
            activity_id: activity.id,
            enrolled,
            days_recorded: totals.days.max(0) as u64,
            total_entries,
            present_entries,
            average_attendance: percentage(present_entries, total_entries),
            marked_today,
        })
    }

    /// Per-activity attendance for one member, plus the raw rows newest first.
    ///
    /// Members may only read their own summary. Administrators see everything;
    /// supervisors see only the activities they are assigned to.
    pub async fn member_summary(
        db: &DatabaseConnection,
        member_id: i64,
        caller_id: i64,
    ) -> AppResult<MemberAttendance> {
        let caller = access::load_caller(db, caller_id).await?;
        if caller.role == UserRole::Member && caller.id != member_id {
            warn!(caller_id, member_id, "Member tried to read another member's attendance");
            return Err(AppError::unauthorized("members may only view their own attendance"));
        }

        let member = user::Model::find_member(db, member_id)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::Member))?;

        let mut records = attendance_record::Model::for_member(db, member.id).await?;

        let activity_ids: Vec<i64> = {
            let mut ids: Vec<i64> = records.iter().map(|r| r.activity_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let activities: BTreeMap<i64, activity::Model> = activity::Entity::find()
            .filter(activity::Column::Id.is_in(activity_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        if caller.role == UserRole::Supervisor {
            records.retain(|r| {
                activities
                    .get(&r.activity_id)
                    .is_some_and(|a| a.is_supervised_by(caller.id))
            });
        }

        let mut counts: BTreeMap<i64, (u64, u64)> = BTreeMap::new();
        for r in &records {
            let entry = counts.entry(r.activity_id).or_default();
            entry.1 += 1;
            if r.status == AttendanceStatus::Present {
                entry.0 += 1;
            }
        }

        let mut present_sum = 0;
        let mut total_sum = 0;
        let summaries: Vec<ActivityAttendance> = counts
            .into_iter()
            .filter_map(|(activity_id, (present, total))| {
                let activity = activities.get(&activity_id)?;
                present_sum += present;
                total_sum += total;
                let pct = percentage(present, total);
                Some(ActivityAttendance {
                    activity_id,
                    activity_code: activity.code.clone(),
                    activity_name: activity.name.clone(),
                    present,
                    total,
                    percentage: pct,
                    standing: Standing::from_percentage(pct),
                })
            })
            .collect();

        Ok(MemberAttendance {
            member_id: member.id,
            overall_percentage: percentage(present_sum, total_sum),
            activities: summaries,
            records,
        })
    }
}
