use async_trait::async_trait;
use uuid::Uuid;

use crate::{exception::TicketResult, model::vo::AssignOutcome};

/// The assignment engine. Both operations re-read mechanic and ticket state
/// from the store and claim rows with conditional updates, so a ticket is
/// never double-assigned and a mechanic never holds two open tasks.
#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Try to hand a just-accepted ticket to an idle mechanic. An empty
    /// candidate pool is a normal outcome, the ticket simply stays queued.
    async fn assign_if_possible(&self, ticket_id: Uuid) -> TicketResult<AssignOutcome>;

    /// Pull the most urgent queued ticket for a newly-freed mechanic:
    /// escalated first, then by priority rank, then oldest first.
    async fn assign_next_queued(&self, mechanic_id: Uuid) -> TicketResult<AssignOutcome>;
}
