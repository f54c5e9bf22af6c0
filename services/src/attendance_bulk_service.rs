use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use db::models::{
    attendance_record::{
        self, ActorRole, AttendanceSource, AttendanceStatus, LedgerEntry, UpsertOutcome,
    },
    user,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::access;
use crate::error::{AppError, AppResult, NotFoundKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BulkEntry {
    pub member_id: i64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub applied: usize,
    pub skipped: usize,
}

pub struct AttendanceBulkService;

impl AttendanceBulkService {
    /// Applies a roster submission for `(activity_id, day)`.
    ///
    /// Members who already scanned in that day are skipped. Skips are part of
    /// the result, never an error. Writes go through the ledger upsert, so an
    /// entry that loses a race with a concurrent scan is also counted as a skip.
    pub async fn apply(
        db: &DatabaseConnection,
        activity_id: i64,
        day: NaiveDate,
        entries: &[BulkEntry],
        caller_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<BulkOutcome> {
        let (caller, activity) = access::activity_staff(db, caller_id, activity_id).await?;

        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(dup) = entries.iter().find(|e| !seen.insert(e.member_id)) {
            return Err(AppError::validation(format!(
                "member {} appears more than once",
                dup.member_id
            )));
        }

        let ids: Vec<i64> = entries.iter().map(|e| e.member_id).collect();
        let known: HashSet<i64> = user::Model::existing_member_ids(db, &ids).await?.into_iter().collect();
        let unknown: Vec<i64> = ids.iter().copied().filter(|id| !known.contains(id)).collect();
        if !unknown.is_empty() {
            warn!(activity_id, ?unknown, "Bulk submission references ids that are not members");
            return Err(AppError::NotFound(NotFoundKind::Member));
        }

        let scanned: HashSet<i64> = attendance_record::Model::member_ids_with_source(
            db,
            activity.id,
            day,
            AttendanceSource::ScanIn,
        )
        .await?
        .into_iter()
        .collect();

        let (skip, apply): (Vec<&BulkEntry>, Vec<&BulkEntry>) =
            entries.iter().partition(|e| scanned.contains(&e.member_id));

        let role = ActorRole::from(caller.role);
        let mut applied = 0;
        let mut skipped = skip.len();

        let txn = db.begin().await?;
        for entry in apply {
            let outcome = attendance_record::Model::upsert(
                &txn,
                LedgerEntry {
                    activity_id: activity.id,
                    member_id: entry.member_id,
                    day,
                    status: entry.status,
                    source: AttendanceSource::BulkSubmission,
                    recorded_by: caller.id,
                    recorded_by_role: role,
                },
                now,
            )
            .await?;

            match outcome {
                UpsertOutcome::Applied => applied += 1,
                UpsertOutcome::Superseded => skipped += 1,
            }
        }
        txn.commit().await?;

        info!(
            activity_id = activity.id,
            %day,
            caller_id = caller.id,
            applied,
            skipped,
            "Bulk attendance applied"
        );

        Ok(BulkOutcome { applied, skipped })
    }
}
