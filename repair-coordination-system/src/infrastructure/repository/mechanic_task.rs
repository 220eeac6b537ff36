use async_trait::async_trait;
use database_model::mechanic_task;
use domain_ticket::{
    model::entity::{mechanic_task::DbMechanicTask, MechanicTask},
    repository::{DbField, MechanicTaskRepo},
};
use sea_orm::{
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use crate::infrastructure::database::{orm::av, OrmRepo};

#[async_trait]
impl MechanicTaskRepo for OrmRepo {
    async fn insert(&self, task: &MechanicTask) -> anyhow::Result<()> {
        let model = mechanic_task::ActiveModel {
            id: Set(task.id),
            ticket_id: Set(task.ticket_id),
            mechanic_id: Set(task.mechanic_id),
            started_at: Set(task.started_at),
            completed_at: Set(task.completed_at),
            notes: Set(task.notes.to_owned()),
            parts_used: Set(serde_json::to_value(&task.parts_used)?),
            created_at: Set(task.created_at),
        };
        mechanic_task::Entity::insert(model).exec(self.connection()).await?;
        Ok(())
    }

    async fn get_open_by_ticket(&self, ticket_id: Uuid) -> anyhow::Result<Option<MechanicTask>> {
        mechanic_task::Entity::find()
            .filter(mechanic_task::Column::TicketId.eq(ticket_id))
            .filter(mechanic_task::Column::CompletedAt.is_null())
            .one(self.connection())
            .await?
            .map(MechanicTask::try_from)
            .transpose()
    }

    async fn update(&self, patch: DbMechanicTask) -> anyhow::Result<()> {
        let parts_used = match patch.parts_used {
            DbField::Set(parts) => Set(serde_json::to_value(parts)?),
            DbField::NotSet => NotSet,
        };
        let id = patch.id;
        let model = mechanic_task::ActiveModel {
            id: Unchanged(id),
            ticket_id: NotSet,
            mechanic_id: NotSet,
            started_at: av(patch.started_at, |v| v),
            completed_at: av(patch.completed_at, |v| v),
            notes: av(patch.notes, |v| v),
            parts_used,
            created_at: NotSet,
        };
        mechanic_task::Entity::update_many()
            .set(model)
            .filter(mechanic_task::Column::Id.eq(id))
            .exec(self.connection())
            .await?;
        Ok(())
    }
}
