use async_trait::async_trait;
use database_model::service;
use domain_ticket::{model::entity::Service, repository::ServiceRepo};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::infrastructure::database::OrmRepo;

#[async_trait]
impl ServiceRepo for OrmRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Service>> {
        service::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .map(Service::try_from)
            .transpose()
    }
}
