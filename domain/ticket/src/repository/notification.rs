use async_trait::async_trait;

use crate::model::entity::Notification;

#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn insert(&self, notification: &Notification) -> anyhow::Result<()>;
}
