use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_ticket::{
    exception::{TicketException, TicketResult},
    model::{
        entity::{
            ticket::{DbTicket, TicketStatus},
            user::UserRole,
            MechanicTask, Ticket,
        },
        vo::AssignOutcome,
    },
    repository::{DbField, MechanicTaskRepo, TicketRepo, UserRepo},
    service::{AssignmentService, NotifyService},
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// How often a lost ticket claim is retried against a re-read queue before
/// the mechanic's slot is handed back.
const MAX_CLAIM_ATTEMPTS: usize = 4;

#[derive(TypedBuilder)]
pub struct AssignmentServiceImpl {
    ticket_repo: Arc<dyn TicketRepo>,
    user_repo: Arc<dyn UserRepo>,
    task_repo: Arc<dyn MechanicTaskRepo>,
    notify_service: Arc<dyn NotifyService>,
}

/// Escalated tickets first, then by priority rank (lower is more urgent),
/// then oldest first.
fn sort_queue(tickets: &mut [Ticket]) {
    tickets.sort_by_key(|t| (!t.is_escalated, t.priority, t.created_at));
}

#[async_trait]
impl AssignmentService for AssignmentServiceImpl {
    async fn assign_if_possible(&self, ticket_id: Uuid) -> TicketResult<AssignOutcome> {
        let ticket = self
            .ticket_repo
            .get_by_id(ticket_id)
            .await?
            .ok_or(TicketException::TicketNotFound { id: ticket_id })?;
        if !matches!(ticket.status, TicketStatus::Accepted) {
            return Ok(AssignOutcome::NoQueuedTicket);
        }

        let mut mechanics = self.user_repo.get_idle_mechanics().await?;
        // Oldest idle first; a mechanic who never had a task leads.
        mechanics.sort_by_key(|m| m.last_assigned_at);

        for mechanic in mechanics {
            if !self.user_repo.try_occupy_slot(mechanic.id, Utc::now()).await? {
                // Slot raced away, the next candidate may still be free.
                continue;
            }
            if self.bind(&ticket, mechanic.id).await? {
                tracing::info!(ticket_id = %ticket.id, mechanic_id = %mechanic.id, "ticket assigned");
                return Ok(AssignOutcome::Assigned {
                    ticket_id: ticket.id,
                    mechanic_id: mechanic.id,
                });
            }
            // The ticket left ACCEPTED while the slot was being claimed;
            // nothing to assign anymore.
            self.user_repo.release_slot(mechanic.id).await?;
            return Ok(AssignOutcome::NoQueuedTicket);
        }

        tracing::debug!(ticket_id = %ticket.id, "no idle mechanic, ticket stays queued");
        Ok(AssignOutcome::NoIdleMechanic)
    }

    async fn assign_next_queued(&self, mechanic_id: Uuid) -> TicketResult<AssignOutcome> {
        let mechanic = self
            .user_repo
            .get_by_id(mechanic_id)
            .await?
            .filter(|u| matches!(u.role, UserRole::Mechanic))
            .ok_or(TicketException::MechanicNotFound { id: mechanic_id })?;
        if !mechanic.is_idle_mechanic() {
            return Ok(AssignOutcome::NoQueuedTicket);
        }
        if !self.user_repo.try_occupy_slot(mechanic_id, Utc::now()).await? {
            return Ok(AssignOutcome::NoQueuedTicket);
        }

        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let mut queued = self.ticket_repo.get_queued().await?;
            sort_queue(&mut queued);
            let Some(ticket) = queued.into_iter().next() else {
                break;
            };
            if self.bind(&ticket, mechanic_id).await? {
                tracing::info!(ticket_id = %ticket.id, mechanic_id = %mechanic_id, "queued ticket claimed");
                return Ok(AssignOutcome::Assigned {
                    ticket_id: ticket.id,
                    mechanic_id,
                });
            }
            // Another assignment got there first; re-read and take the
            // next best.
        }

        self.user_repo.release_slot(mechanic_id).await?;
        Ok(AssignOutcome::NoQueuedTicket)
    }
}

impl AssignmentServiceImpl {
    /// Claim `ticket` for a mechanic whose slot is already occupied and
    /// create the work record. False when the ticket was raced out of
    /// ACCEPTED; the caller still owns the slot then.
    async fn bind(&self, ticket: &Ticket, mechanic_id: Uuid) -> TicketResult<bool> {
        let now = Utc::now();
        let claimed = self
            .ticket_repo
            .update_where_status(
                DbTicket {
                    id: ticket.id,
                    mechanic_id: DbField::Set(Some(mechanic_id)),
                    status: DbField::Set(TicketStatus::Assigned),
                    assigned_at: DbField::Set(Some(now)),
                    ..Default::default()
                },
                &[TicketStatus::Accepted],
            )
            .await?;
        if !claimed {
            return Ok(false);
        }

        self.task_repo.insert(&MechanicTask::create(ticket.id, mechanic_id, now)).await?;

        if let Err(e) = self
            .notify_service
            .notify(mechanic_id, "New Job Assigned", &format!("Ticket \"{}\" is now yours.", ticket.title))
            .await
        {
            tracing::warn!(ticket_id = %ticket.id, "mechanic notification failed: {e}");
        }
        if let Err(e) = self
            .notify_service
            .notify(
                ticket.client_id,
                "Mechanic Assigned",
                &format!("A mechanic has been assigned to your ticket \"{}\".", ticket.title),
            )
            .await
        {
            tracing::warn!(ticket_id = %ticket.id, "client notification failed: {e}");
        }
        Ok(true)
    }
}
