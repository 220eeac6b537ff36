use async_trait::async_trait;

use crate::model::entity::Severity;

#[async_trait]
pub trait SeverityRepo: Send + Sync {
    async fn get_by_id(&self, id: i32) -> anyhow::Result<Option<Severity>>;
}
