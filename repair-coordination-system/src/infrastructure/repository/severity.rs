use async_trait::async_trait;
use database_model::severity;
use domain_ticket::{model::entity::Severity, repository::SeverityRepo};
use sea_orm::EntityTrait;

use crate::infrastructure::database::OrmRepo;

#[async_trait]
impl SeverityRepo for OrmRepo {
    async fn get_by_id(&self, id: i32) -> anyhow::Result<Option<Severity>> {
        Ok(severity::Entity::find_by_id(id).one(self.connection()).await?.map(Into::into))
    }
}
