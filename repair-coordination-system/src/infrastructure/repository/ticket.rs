use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database_model::{service, severity, ticket};
use domain_ticket::{
    model::entity::{
        ticket::{CancelledBy, DbTicket, TicketStatus},
        Severity, Ticket,
    },
    repository::TicketRepo,
};
use sea_orm::{
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::infrastructure::database::{orm::av, OrmRepo};

fn patch_to_model(patch: DbTicket) -> ticket::ActiveModel {
    ticket::ActiveModel {
        id: Unchanged(patch.id),
        client_id: NotSet,
        mechanic_id: av(patch.mechanic_id, |v| v),
        service_id: NotSet,
        title: NotSet,
        description: NotSet,
        image_url: NotSet,
        priority: av(patch.priority, |v| v),
        cost: av(patch.cost, |v| v),
        status: av(patch.status, |v| v as i32),
        is_escalated: av(patch.is_escalated, |v| v),
        is_paid: av(patch.is_paid, |v| v),
        payment_method: av(patch.payment_method, |v| v.map(|m| m as i32)),
        created_at: NotSet,
        accepted_at: av(patch.accepted_at, |v| v),
        assigned_at: av(patch.assigned_at, |v| v),
        completed_at: av(patch.completed_at, |v| v),
        cancelled_at: av(patch.cancelled_at, |v| v),
        cancelled_by: av(patch.cancelled_by, |v| v.map(|b| b as i32)),
        cancellation_reason: av(patch.cancellation_reason, |v| v),
    }
}

fn status_values(statuses: &[TicketStatus]) -> Vec<i32> {
    statuses.iter().map(|s| s.to_owned() as i32).collect()
}

#[async_trait]
impl TicketRepo for OrmRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ticket>> {
        ticket::Entity::find_by_id(id)
            .one(self.connection())
            .await?
            .map(Ticket::try_from)
            .transpose()
    }

    async fn insert(&self, t: &Ticket) -> anyhow::Result<()> {
        let model = ticket::ActiveModel {
            id: Set(t.id),
            client_id: Set(t.client_id),
            mechanic_id: Set(t.mechanic_id),
            service_id: Set(t.service_id),
            title: Set(t.title.to_owned()),
            description: Set(t.description.to_owned()),
            image_url: Set(t.image_url.to_owned()),
            priority: Set(t.priority),
            cost: Set(t.cost),
            status: Set(t.status.to_owned() as i32),
            is_escalated: Set(t.is_escalated),
            is_paid: Set(t.is_paid),
            payment_method: Set(t.payment_method.to_owned().map(|m| m as i32)),
            created_at: Set(t.created_at),
            accepted_at: Set(t.accepted_at),
            assigned_at: Set(t.assigned_at),
            completed_at: Set(t.completed_at),
            cancelled_at: Set(t.cancelled_at),
            cancelled_by: Set(t.cancelled_by.to_owned().map(|b| b as i32)),
            cancellation_reason: Set(t.cancellation_reason.to_owned()),
        };
        ticket::Entity::insert(model).exec(self.connection()).await?;
        Ok(())
    }

    async fn update(&self, patch: DbTicket) -> anyhow::Result<()> {
        let id = patch.id;
        ticket::Entity::update_many()
            .set(patch_to_model(patch))
            .filter(ticket::Column::Id.eq(id))
            .exec(self.connection())
            .await?;
        Ok(())
    }

    async fn update_where_status(
        &self,
        patch: DbTicket,
        expected: &[TicketStatus],
    ) -> anyhow::Result<bool> {
        let id = patch.id;
        let result = ticket::Entity::update_many()
            .set(patch_to_model(patch))
            .filter(ticket::Column::Id.eq(id))
            .filter(ticket::Column::Status.is_in(status_values(expected)))
            .exec(self.connection())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn get_queued(&self) -> anyhow::Result<Vec<Ticket>> {
        ticket::Entity::find()
            .filter(ticket::Column::Status.eq(TicketStatus::Accepted as i32))
            .order_by_desc(ticket::Column::IsEscalated)
            .order_by_asc(ticket::Column::Priority)
            .order_by_asc(ticket::Column::CreatedAt)
            .all(self.connection())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn get_open_with_severity(&self) -> anyhow::Result<Vec<(Ticket, Severity)>> {
        let open = ticket::Entity::find()
            .filter(ticket::Column::Status.is_in(status_values(&[
                TicketStatus::Pending,
                TicketStatus::Accepted,
            ])))
            .all(self.connection())
            .await?;

        let service_ids: Vec<Uuid> = open.iter().map(|t| t.service_id).collect();
        let severity_of_service: HashMap<Uuid, i32> = service::Entity::find()
            .filter(service::Column::Id.is_in(service_ids))
            .all(self.connection())
            .await?
            .into_iter()
            .map(|s| (s.id, s.severity_id))
            .collect();
        let severities: HashMap<i32, Severity> = severity::Entity::find()
            .filter(
                severity::Column::Id
                    .is_in(severity_of_service.values().copied().collect::<Vec<_>>()),
            )
            .all(self.connection())
            .await?
            .into_iter()
            .map(|s| (s.id, Severity::from(s)))
            .collect();

        let mut joined = Vec::with_capacity(open.len());
        for model in open {
            let severity = severity_of_service
                .get(&model.service_id)
                .and_then(|id| severities.get(id));
            match severity {
                Some(severity) => joined.push((Ticket::try_from(model)?, severity.to_owned())),
                // A ticket whose policy row is gone can't be judged; skip it.
                None => tracing::warn!(ticket_id = %model.id, "no severity policy found for ticket"),
            }
        }
        Ok(joined)
    }

    async fn cancel_where_pending(
        &self,
        ids: &[Uuid],
        by: CancelledBy,
        reason: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<u64> {
        let result = ticket::Entity::update_many()
            .set(ticket::ActiveModel {
                status: Set(TicketStatus::Cancelled as i32),
                cancelled_at: Set(Some(now)),
                cancelled_by: Set(Some(by as i32)),
                cancellation_reason: Set(Some(reason.to_owned())),
                ..Default::default()
            })
            .filter(ticket::Column::Id.is_in(ids.iter().copied()))
            .filter(ticket::Column::Status.eq(TicketStatus::Pending as i32))
            .exec(self.connection())
            .await?;
        Ok(result.rows_affected)
    }

    async fn escalate_where_accepted(&self, ids: &[Uuid]) -> anyhow::Result<u64> {
        let result = ticket::Entity::update_many()
            .set(ticket::ActiveModel {
                is_escalated: Set(true),
                ..Default::default()
            })
            .filter(ticket::Column::Id.is_in(ids.iter().copied()))
            .filter(ticket::Column::Status.eq(TicketStatus::Accepted as i32))
            .exec(self.connection())
            .await?;
        Ok(result.rows_affected)
    }
}
