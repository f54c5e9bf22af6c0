use db::models::{
    activity, enrollment,
    user::{self, UserRole},
};
use sea_orm::DatabaseConnection;

pub struct Directory {
    pub admin: user::Model,
    pub supervisor: user::Model,
    pub other_supervisor: user::Model,
    pub members: Vec<user::Model>,
    pub outsider: user::Model,
    pub activity: activity::Model,
}

impl Directory {
    /// Supervisor `f100` runs `COS110` with members `m1..m3` enrolled;
    /// `m9` is a member of nothing.
    pub async fn seed(db: &DatabaseConnection) -> Self {
        let admin = user::Model::create(db, "admin", "Ada Admin", UserRole::Administrator)
            .await
            .unwrap();
        let supervisor = user::Model::create(db, "f100", "Farah Faculty", UserRole::Supervisor)
            .await
            .unwrap();
        let other_supervisor = user::Model::create(db, "f200", "Gus Faculty", UserRole::Supervisor)
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
        }
    }
}
