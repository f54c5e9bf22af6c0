//! Caller resolution and the activity-level permission checks shared by the
//! attendance services.

use db::models::{
    activity,
    user::{self, UserRole},
};
use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::warn;

use crate::error::{AppError, AppResult, NotFoundKind};

/// Loads the calling user. An id that maps to no user is an authorization
/// failure, not a missing resource.
pub async fn load_caller<C>(db: &C, caller_id: i64) -> AppResult<user::Model>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(caller_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!(caller_id, "Unknown caller");
            AppError::unauthorized("unknown caller")
        })
}

pub async fn load_activity<C>(db: &C, activity_id: i64) -> AppResult<activity::Model>
where
    C: ConnectionTrait,
{
    activity::Entity::find_by_id(activity_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound(NotFoundKind::Activity))
}

/// Caller must be a supervisor assigned to the activity.
pub async fn assigned_supervisor<C>(
    db: &C,
    caller_id: i64,
    activity_id: i64,
) -> AppResult<(user::Model, activity::Model)>
where
    C: ConnectionTrait,
{
    let user = load_caller(db, caller_id).await?;
    if user.role != UserRole::Supervisor {
        warn!(caller_id, activity_id, role = %user.role, "Supervisor role required");
        return Err(AppError::unauthorized("supervisor role required"));
    }

    let activity = load_activity(db, activity_id).await?;
    if !activity.is_supervised_by(user.id) {
        warn!(caller_id, activity_id, "Caller is not the assigned supervisor");
        return Err(AppError::unauthorized(
            "not the assigned supervisor for this activity",
        ));
    }

    Ok((user, activity))
}

/// Caller must be an administrator, or the supervisor assigned to the activity.
pub async fn activity_staff<C>(
    db: &C,
    caller_id: i64,
    activity_id: i64,
) -> AppResult<(user::Model, activity::Model)>
where
    C: ConnectionTrait,
{
    let user = load_caller(db, caller_id).await?;
    let activity = load_activity(db, activity_id).await?;

    let allowed = match user.role {
        UserRole::Administrator => true,
        UserRole::Supervisor => activity.is_supervised_by(user.id),
        UserRole::Member => false,
    };
    if !allowed {
        warn!(caller_id, activity_id, role = %user.role, "Activity staff access denied");
        return Err(AppError::unauthorized(
            "administrator or assigned supervisor required",
        ));
    }

    Ok((user, activity))
}
