use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::PaginatorTrait;

/// Roster membership: a member belongs to an activity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub member_id: i64,

    pub enrolled_at: DateTime<Utc>,
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

impl Model {
    /// Adds a member to an activity roster. Re-enrolling is a no-op.
    pub async fn enroll<C>(db: &C, activity_id: i64, member_id: i64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model = ActiveModel {
            activity_id: Set(activity_id),
            member_id: Set(member_id),
            enrolled_at: Set(Utc::now()),
        };

        Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([Column::ActivityId, Column::MemberId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(())
    }

    pub async fn is_enrolled<C>(db: &C, activity_id: i64, member_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let found = Entity::find_by_id((activity_id, member_id)).one(db).await?;
        Ok(found.is_some())
    }

    pub async fn count_for_activity<C>(db: &C, activity_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .count(db)
            .await
    }
}
