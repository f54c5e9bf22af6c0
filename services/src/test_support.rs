use chrono::{DateTime, TimeZone, Utc};
use db::models::{
    activity, enrollment,
    user::{self, UserRole},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};

/// A small directory: one administrator, two supervisors, an activity for each
/// supervisor, three members enrolled in the first activity and one outsider.
pub struct Fixture {
    pub admin: user::Model,
    pub supervisor: user::Model,
    pub other_supervisor: user::Model,
    pub members: Vec<user::Model>,
    pub outsider: user::Model,
    pub activity: activity::Model,
    pub other_activity: activity::Model,
}

impl Fixture {
    pub async fn seed(db: &DatabaseConnection) -> Self {
        let admin = user::Model::create(db, "admin", "Ada Admin", UserRole::Administrator)
            .await
            .unwrap();
        let supervisor = user::Model::create(db, "f100", "Farah Faculty", UserRole::Supervisor)
            .await
            .unwrap();
        let other_supervisor =
            user::Model::create(db, "f200", "Gus Faculty", UserRole::Supervisor)
                .await
                .unwrap();

        let mut members = Vec::new();
        for (username, name) in [("m1", "Mo One"), ("m2", "Mia Two"), ("m3", "Max Three")] {
            members.push(
                user::Model::create(db, username, name, UserRole::Member)
                    .await
                    .unwrap(),
            );
        }
        let outsider = user::Model::create(db, "m9", "Olive Outsider", UserRole::Member)
            .await
            .unwrap();

        let activity = activity::Model::create(db, "COS110", "Programming", Some(supervisor.id))
            .await
            .unwrap();
        let other_activity =
            activity::Model::create(db, "COS120", "Algorithms", Some(other_supervisor.id))
                .await
                .unwrap();

        for m in &members {
            enrollment::Model::enroll(db, activity.id, m.id).await.unwrap();
        }

        Self {
            admin,
            supervisor,
            other_supervisor,
            members,
            outsider,
            activity,
            other_activity,
        }
    }
}

/// A fixed instant on 2026-04-14.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 14, hour, minute, 0).unwrap()
}

/// Removes an activity row while leaving its sessions and enrollments behind.
pub async fn orphan_activity(db: &DatabaseConnection, activity_id: i64) {
    db.execute_unprepared("PRAGMA foreign_keys = OFF").await.unwrap();
    activity::Entity::delete_by_id(activity_id)
        .exec(db)
        .await
        .unwrap();
}
