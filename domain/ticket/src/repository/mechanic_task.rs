use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::{mechanic_task::DbMechanicTask, MechanicTask};

#[async_trait]
pub trait MechanicTaskRepo: Send + Sync {
    async fn insert(&self, task: &MechanicTask) -> anyhow::Result<()>;

    /// The ticket's open work record (`completed_at` is null), if any.
    async fn get_open_by_ticket(&self, ticket_id: Uuid) -> anyhow::Result<Option<MechanicTask>>;

    async fn update(&self, patch: DbMechanicTask) -> anyhow::Result<()>;
}
