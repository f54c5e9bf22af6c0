use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::QuerySelect;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a user in the `users` table.
///
/// Identity resolution maps an authenticated caller id onto one of these rows;
/// the `role` decides which attendance operations the caller may perform.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name (staff or student number).
    pub username: String,
    /// Name shown on rosters and scan lists.
    pub display_name: String,
    /// Platform-wide role.
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platform-wide role of a user.
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
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UserRole {
    #[sea_orm(string_value = "administrator")]
    Administrator,

    #[sea_orm(string_value = "supervisor")]
    Supervisor,

    #[sea_orm(string_value = "member")]
    Member,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        username: &str,
        display_name: &str,
        role: UserRole,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();

        let active_model = ActiveModel {
            username: Set(username.to_owned()),
            display_name: Set(display_name.to_owned()),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    /// Resolves a member profile: a user that exists *and* holds the member role.
    pub async fn find_member<C>(db: &C, user_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Id.eq(user_id))
            .filter(Column::Role.eq(UserRole::Member))
            .one(db)
            .await
    }

    /// Returns the subset of `ids` that belong to users with the member role.
    pub async fn existing_member_ids<C>(db: &C, ids: &[i64]) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Id.is_in(ids.iter().copied()))
            .filter(Column::Role.eq(UserRole::Member))
            .into_tuple::<i64>()
            .all(db)
            .await
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Administrator
    }
}
