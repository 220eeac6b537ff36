use async_trait::async_trait;
use database_model::notification;
use domain_ticket::{model::entity::Notification, repository::NotificationRepo};
use sea_orm::{ActiveValue::Set, EntityTrait};

use crate::infrastructure::database::OrmRepo;

#[async_trait]
impl NotificationRepo for OrmRepo {
    async fn insert(&self, n: &Notification) -> anyhow::Result<()> {
        let model = notification::ActiveModel {
            id: Set(n.id),
            user_id: Set(n.user_id),
            title: Set(n.title.to_owned()),
            message: Set(n.message.to_owned()),
            kind: Set(n.kind.to_owned() as i32),
            is_read: Set(n.is_read),
            created_at: Set(n.created_at),
        };
        notification::Entity::insert(model).exec(self.connection()).await?;
        Ok(())
    }
}
