use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_ticket::{
    exception::{TicketException, TicketResult},
    model::{
        entity::{
            mechanic_task::{DbMechanicTask, PartUsed},
            ticket::{CancelledBy, DbTicket, TicketStatus},
            user::{DbUser, UserRole, UserStatus},
            MechanicTask, Ticket, User,
        },
        vo::{AssignOutcome, NewTicket},
    },
    repository::{
        DbField, MechanicTaskRepo, ServiceRepo, SeverityRepo, TicketRepo, UserRepo,
    },
    service::{AssignmentService, NotifyService, TicketFlowService},
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(TypedBuilder)]
pub struct TicketFlowServiceImpl {
    ticket_repo: Arc<dyn TicketRepo>,
    user_repo: Arc<dyn UserRepo>,
    task_repo: Arc<dyn MechanicTaskRepo>,
    service_repo: Arc<dyn ServiceRepo>,
    severity_repo: Arc<dyn SeverityRepo>,
    notify_service: Arc<dyn NotifyService>,
    assignment_service: Arc<dyn AssignmentService>,
}

#[async_trait]
impl TicketFlowService for TicketFlowServiceImpl {
    async fn create_ticket(&self, input: NewTicket) -> TicketResult<Ticket> {
        let service = self
            .service_repo
            .get_by_id(input.service_id)
            .await?
            .ok_or(TicketException::ServiceNotFound { id: input.service_id })?;
        if !service.is_active {
            return Err(TicketException::ServiceDisabled { id: service.id });
        }
        let severity = self
            .severity_repo
            .get_by_id(service.severity_id)
            .await?
            .ok_or(TicketException::SeverityNotFound { id: service.severity_id })?;

        let ticket = Ticket::create(input, &service, &severity, Utc::now());
        self.ticket_repo.insert(&ticket).await?;
        tracing::info!(ticket_id = %ticket.id, severity = %severity.name, "ticket created");

        if let Err(e) = self
            .notify_service
            .notify_role(
                UserRole::Admin,
                "New Ticket",
                &format!("A new ticket \"{}\" is waiting for review.", ticket.title),
            )
            .await
        {
            tracing::warn!(ticket_id = %ticket.id, "intake notification failed: {e}");
        }
        Ok(ticket)
    }

    async fn accept_ticket(&self, ticket_id: Uuid) -> TicketResult<Ticket> {
        let ticket = self.get_ticket(ticket_id).await?;

        let accepted = self
            .ticket_repo
            .update_where_status(
                DbTicket {
                    id: ticket_id,
                    status: DbField::Set(TicketStatus::Accepted),
                    accepted_at: DbField::Set(Some(Utc::now())),
                    ..Default::default()
                },
                &[TicketStatus::Pending],
            )
            .await?;
        if !accepted {
            return Err(self.state_conflict(ticket_id, "accepted").await?);
        }

        match self.assignment_service.assign_if_possible(ticket_id).await? {
            AssignOutcome::Assigned { mechanic_id, .. } => {
                tracing::info!(ticket_id = %ticket_id, mechanic_id = %mechanic_id, "assigned on accept");
            }
            _ => tracing::debug!(ticket_id = %ticket_id, "accepted into the queue"),
        }

        if let Err(e) = self
            .notify_service
            .notify(
                ticket.client_id,
                "Ticket Accepted",
                &format!("Your ticket \"{}\" has been accepted.", ticket.title),
            )
            .await
        {
            tracing::warn!(ticket_id = %ticket_id, "accept notification failed: {e}");
        }
        self.get_ticket(ticket_id).await
    }

    async fn cancel_ticket(
        &self,
        ticket_id: Uuid,
        by: CancelledBy,
        reason: Option<String>,
    ) -> TicketResult<Ticket> {
        let ticket = self.get_ticket(ticket_id).await?;

        let cancelled = self
            .ticket_repo
            .update_where_status(
                DbTicket {
                    id: ticket_id,
                    status: DbField::Set(TicketStatus::Cancelled),
                    cancelled_at: DbField::Set(Some(Utc::now())),
                    cancelled_by: DbField::Set(Some(by.clone())),
                    cancellation_reason: DbField::Set(reason),
                    ..Default::default()
                },
                &[TicketStatus::Pending, TicketStatus::Accepted],
            )
            .await?;
        if !cancelled {
            return Err(self.state_conflict(ticket_id, "cancelled").await?);
        }
        tracing::info!(ticket_id = %ticket_id, by = ?by, "ticket cancelled");

        let notified = match by {
            CancelledBy::Client => {
                self.notify_service
                    .notify_role(
                        UserRole::Admin,
                        "Ticket Cancelled",
                        &format!("The client cancelled ticket \"{}\".", ticket.title),
                    )
                    .await
            }
            _ => {
                self.notify_service
                    .notify(
                        ticket.client_id,
                        "Ticket Cancelled",
                        &format!("Your ticket \"{}\" has been cancelled.", ticket.title),
                    )
                    .await
            }
        };
        if let Err(e) = notified {
            tracing::warn!(ticket_id = %ticket_id, "cancel notification failed: {e}");
        }
        self.get_ticket(ticket_id).await
    }

    async fn start_task(&self, ticket_id: Uuid, mechanic_id: Uuid) -> TicketResult<Ticket> {
        let ticket = self.get_ticket(ticket_id).await?;
        if ticket.mechanic_id != Some(mechanic_id) {
            return Err(TicketException::MechanicMismatch { id: ticket_id, mechanic_id });
        }

        let started = self
            .ticket_repo
            .update_where_status(
                DbTicket {
                    id: ticket_id,
                    status: DbField::Set(TicketStatus::InProgress),
                    ..Default::default()
                },
                &[TicketStatus::Assigned],
            )
            .await?;
        if !started {
            return Err(self.state_conflict(ticket_id, "started").await?);
        }

        let task = self.get_open_task(ticket_id).await?;
        self.task_repo
            .update(DbMechanicTask {
                id: task.id,
                started_at: DbField::Set(Some(Utc::now())),
                ..Default::default()
            })
            .await?;
        self.get_ticket(ticket_id).await
    }

    async fn complete_task(&self, ticket_id: Uuid, mechanic_id: Uuid) -> TicketResult<Ticket> {
        let ticket = self.get_ticket(ticket_id).await?;
        if ticket.mechanic_id != Some(mechanic_id) {
            return Err(TicketException::MechanicMismatch { id: ticket_id, mechanic_id });
        }

        let now = Utc::now();
        let completed = self
            .ticket_repo
            .update_where_status(
                DbTicket {
                    id: ticket_id,
                    status: DbField::Set(TicketStatus::Completed),
                    completed_at: DbField::Set(Some(now)),
                    ..Default::default()
                },
                &[TicketStatus::InProgress],
            )
            .await?;
        if !completed {
            return Err(self.state_conflict(ticket_id, "completed").await?);
        }

        let task = self.get_open_task(ticket_id).await?;
        self.task_repo
            .update(DbMechanicTask {
                id: task.id,
                completed_at: DbField::Set(Some(now)),
                ..Default::default()
            })
            .await?;
        self.user_repo.release_slot(mechanic_id).await?;
        tracing::info!(ticket_id = %ticket_id, mechanic_id = %mechanic_id, "task completed, slot freed");

        if let Err(e) = self
            .notify_service
            .notify(
                ticket.client_id,
                "Ticket Completed",
                &format!("Work on your ticket \"{}\" is done.", ticket.title),
            )
            .await
        {
            tracing::warn!(ticket_id = %ticket_id, "completion notification failed: {e}");
        }

        match self.assignment_service.assign_next_queued(mechanic_id).await? {
            AssignOutcome::Assigned { ticket_id: next, .. } => {
                tracing::info!(mechanic_id = %mechanic_id, ticket_id = %next, "next queued ticket claimed");
            }
            _ => tracing::debug!(mechanic_id = %mechanic_id, "queue empty after completion"),
        }
        self.get_ticket(ticket_id).await
    }

    async fn punch_in(&self, mechanic_id: Uuid) -> TicketResult<User> {
        self.get_mechanic(mechanic_id).await?;
        self.user_repo
            .update(DbUser {
                id: mechanic_id,
                status: DbField::Set(UserStatus::Active),
                ..Default::default()
            })
            .await?;
        tracing::info!(mechanic_id = %mechanic_id, "mechanic punched in");

        match self.assignment_service.assign_next_queued(mechanic_id).await? {
            AssignOutcome::Assigned { ticket_id, .. } => {
                tracing::info!(mechanic_id = %mechanic_id, ticket_id = %ticket_id, "assigned on punch-in");
            }
            _ => tracing::debug!(mechanic_id = %mechanic_id, "nothing queued on punch-in"),
        }
        self.get_mechanic(mechanic_id).await
    }

    async fn punch_out(&self, mechanic_id: Uuid) -> TicketResult<User> {
        self.get_mechanic(mechanic_id).await?;
        self.user_repo
            .update(DbUser {
                id: mechanic_id,
                status: DbField::Set(UserStatus::Disabled),
                ..Default::default()
            })
            .await?;
        tracing::info!(mechanic_id = %mechanic_id, "mechanic punched out");
        self.get_mechanic(mechanic_id).await
    }

    async fn override_priority(&self, ticket_id: Uuid, priority: i32) -> TicketResult<Ticket> {
        self.get_ticket(ticket_id).await?;
        self.ticket_repo
            .update(DbTicket {
                id: ticket_id,
                priority: DbField::Set(priority),
                ..Default::default()
            })
            .await?;
        tracing::info!(ticket_id = %ticket_id, priority, "priority overridden");
        self.get_ticket(ticket_id).await
    }

    async fn add_parts_used(
        &self,
        ticket_id: Uuid,
        items: Vec<PartUsed>,
    ) -> TicketResult<MechanicTask> {
        let mut task = self.get_open_task(ticket_id).await?;
        task.add_parts(items);
        self.task_repo
            .update(DbMechanicTask {
                id: task.id,
                parts_used: DbField::Set(task.parts_used.clone()),
                ..Default::default()
            })
            .await?;
        Ok(task)
    }
}

impl TicketFlowServiceImpl {
    async fn get_ticket(&self, id: Uuid) -> TicketResult<Ticket> {
        self.ticket_repo
            .get_by_id(id)
            .await?
            .ok_or(TicketException::TicketNotFound { id })
    }

    async fn get_mechanic(&self, id: Uuid) -> TicketResult<User> {
        self.user_repo
            .get_by_id(id)
            .await?
            .filter(|u| matches!(u.role, UserRole::Mechanic))
            .ok_or(TicketException::MechanicNotFound { id })
    }

    async fn get_open_task(&self, ticket_id: Uuid) -> TicketResult<MechanicTask> {
        self.task_repo
            .get_open_by_ticket(ticket_id)
            .await?
            .ok_or(TicketException::MechanicTaskNotFound { id: ticket_id })
    }

    /// A conditional transition found the ticket in another state; report
    /// the state actually observed.
    async fn state_conflict(
        &self,
        id: Uuid,
        action: &'static str,
    ) -> TicketResult<TicketException> {
        let current = self.get_ticket(id).await?;
        Ok(TicketException::InvalidStateTransition {
            id,
            from: current.status,
            action,
        })
    }
}
