use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::entity::{
    ticket::{CancelledBy, DbTicket, TicketStatus},
    Severity, Ticket,
};

#[async_trait]
pub trait TicketRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ticket>>;

    async fn insert(&self, ticket: &Ticket) -> anyhow::Result<()>;

    /// Unconditional partial update.
    async fn update(&self, patch: DbTicket) -> anyhow::Result<()>;

    /// Apply `patch` only while the ticket still has one of the `expected`
    /// statuses, as a single conditional statement. Returns false when the
    /// row was raced away by a concurrent transition.
    async fn update_where_status(
        &self,
        patch: DbTicket,
        expected: &[TicketStatus],
    ) -> anyhow::Result<bool>;

    /// Every ticket waiting in the assignment queue (ACCEPTED).
    async fn get_queued(&self) -> anyhow::Result<Vec<Ticket>>;

    /// Open tickets (PENDING or ACCEPTED) joined with the severity policy
    /// of their service. One query, used by the SLA sweep.
    async fn get_open_with_severity(&self) -> anyhow::Result<Vec<(Ticket, Severity)>>;

    /// Batch-cancel, conditioned on the rows still being PENDING.
    /// Returns the number of rows actually cancelled.
    async fn cancel_where_pending(
        &self,
        ids: &[Uuid],
        by: CancelledBy,
        reason: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<u64>;

    /// Batch-escalate, conditioned on the rows still being ACCEPTED.
    /// Returns the number of rows actually escalated.
    async fn escalate_where_accepted(&self, ids: &[Uuid]) -> anyhow::Result<u64>;
}
