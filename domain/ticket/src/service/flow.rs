use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    exception::TicketResult,
    model::{
        entity::{
            mechanic_task::PartUsed,
            ticket::CancelledBy,
            MechanicTask, Ticket, User,
        },
        vo::NewTicket,
    },
};

/// The trigger surface of the ticket lifecycle, invoked by request handlers
/// outside this core. Each operation guards its source state with a
/// conditional update and returns the resulting snapshot.
#[async_trait]
pub trait TicketFlowService: Send + Sync {
    /// Client intake; the new ticket starts PENDING with its priority
    /// snapshotted from the service's severity.
    async fn create_ticket(&self, input: NewTicket) -> TicketResult<Ticket>;

    /// Admin accept: PENDING -> ACCEPTED, then an immediate assignment
    /// attempt.
    async fn accept_ticket(&self, ticket_id: Uuid) -> TicketResult<Ticket>;

    /// Cancel from PENDING or ACCEPTED.
    async fn cancel_ticket(
        &self,
        ticket_id: Uuid,
        by: CancelledBy,
        reason: Option<String>,
    ) -> TicketResult<Ticket>;

    /// Mechanic starts the assigned work: ASSIGNED -> IN_PROGRESS.
    async fn start_task(&self, ticket_id: Uuid, mechanic_id: Uuid) -> TicketResult<Ticket>;

    /// Mechanic finishes: IN_PROGRESS -> COMPLETED, frees the slot and
    /// immediately tries to pull the next queued ticket.
    async fn complete_task(&self, ticket_id: Uuid, mechanic_id: Uuid) -> TicketResult<Ticket>;

    /// Mechanic becomes available and immediately picks up queued work.
    async fn punch_in(&self, mechanic_id: Uuid) -> TicketResult<User>;

    /// Mechanic goes off shift; a task already in hand stays theirs.
    async fn punch_out(&self, mechanic_id: Uuid) -> TicketResult<User>;

    /// Explicit admin override of the priority snapshot. Does not touch
    /// escalation eligibility.
    async fn override_priority(&self, ticket_id: Uuid, priority: i32) -> TicketResult<Ticket>;

    /// Record consumed parts on the ticket's open work record.
    async fn add_parts_used(
        &self,
        ticket_id: Uuid,
        items: Vec<PartUsed>,
    ) -> TicketResult<MechanicTask>;
}
