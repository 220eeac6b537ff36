use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::Service;

#[async_trait]
pub trait ServiceRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Service>>;
}
