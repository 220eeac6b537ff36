use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database_model::user;
use domain_ticket::{
    model::entity::{
        user::{DbUser, UserRole, UserStatus},
        User,
    },
    repository::UserRepo,
};
use sea_orm::{
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::infrastructure::database::{orm::av, OrmRepo};

fn patch_to_model(patch: DbUser) -> user::ActiveModel {
    user::ActiveModel {
        id: Unchanged(patch.id),
        name: NotSet,
        email: NotSet,
        mobile: NotSet,
        role: NotSet,
        status: av(patch.status, |v| v as i32),
        assigned_count: av(patch.assigned_count, |v| v),
        last_assigned_at: av(patch.last_assigned_at, |v| v),
        created_at: NotSet,
    }
}

#[async_trait]
impl UserRepo for OrmRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        user::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn get_by_role(&self, role: UserRole) -> anyhow::Result<Vec<User>> {
        user::Entity::find()
            .filter(user::Column::Role.eq(role as i32))
            .all(self.connection())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn get_idle_mechanics(&self) -> anyhow::Result<Vec<User>> {
        user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Mechanic as i32))
            .filter(user::Column::Status.eq(UserStatus::Active as i32))
            .filter(user::Column::AssignedCount.eq(0))
            .order_by_asc(user::Column::LastAssignedAt)
            .all(self.connection())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn update(&self, patch: DbUser) -> anyhow::Result<()> {
        let id = patch.id;
        user::Entity::update_many()
            .set(patch_to_model(patch))
            .filter(user::Column::Id.eq(id))
            .exec(self.connection())
            .await?;
        Ok(())
    }

    async fn try_occupy_slot(&self, id: Uuid, now: DateTime<Utc>) -> anyhow::Result<bool> {
        let result = user::Entity::update_many()
            .set(user::ActiveModel {
                assigned_count: Set(1),
                last_assigned_at: Set(Some(now)),
                ..Default::default()
            })
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Role.eq(UserRole::Mechanic as i32))
            .filter(user::Column::Status.eq(UserStatus::Active as i32))
            .filter(user::Column::AssignedCount.eq(0))
            .exec(self.connection())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn release_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = user::Entity::update_many()
            .set(user::ActiveModel {
                assigned_count: Set(0),
                ..Default::default()
            })
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::AssignedCount.gt(0))
            .exec(self.connection())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
