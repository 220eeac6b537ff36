use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_ticket::{
    model::{
        entity::{
            ticket::{CancelledBy, TicketStatus},
            user::UserRole,
            Ticket,
        },
        vo::SweepReport,
    },
    repository::TicketRepo,
    service::{NotifyService, SlaSweepService},
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

const ACCEPT_BREACH_REASON: &str = "Auto-cancelled due to Accept SLA breach";

#[derive(TypedBuilder)]
pub struct SlaSweepServiceImpl {
    ticket_repo: Arc<dyn TicketRepo>,
    notify_service: Arc<dyn NotifyService>,
}

#[async_trait]
impl SlaSweepService for SlaSweepServiceImpl {
    async fn run_sweep_once(&self, now: DateTime<Utc>) -> anyhow::Result<SweepReport> {
        let open = self.ticket_repo.get_open_with_severity().await?;

        let mut expired: Vec<&Ticket> = Vec::new();
        let mut breached: Vec<&Ticket> = Vec::new();
        for (ticket, severity) in &open {
            match ticket.status {
                TicketStatus::Pending if now > severity.accept_deadline(ticket.created_at) => {
                    expired.push(ticket);
                }
                TicketStatus::Accepted
                    if !ticket.is_escalated
                        && now > severity.assign_deadline(ticket.created_at) =>
                {
                    breached.push(ticket);
                }
                _ => {}
            }
        }

        let mut report = SweepReport::default();

        if !expired.is_empty() {
            let ids: Vec<Uuid> = expired.iter().map(|t| t.id).collect();
            // Conditioned on the rows still being PENDING, so a ticket
            // accepted or cancelled mid-sweep is left alone.
            let affected = self
                .ticket_repo
                .cancel_where_pending(&ids, CancelledBy::System, ACCEPT_BREACH_REASON, now)
                .await?;
            tracing::info!(matched = ids.len(), affected, "auto-cancelled tickets past the accept deadline");

            for ticket in &expired {
                if let Err(e) = self
                    .notify_service
                    .notify(
                        ticket.client_id,
                        "Ticket Cancelled",
                        "Your ticket was cancelled as it wasn't accepted within the SLA period.",
                    )
                    .await
                {
                    tracing::warn!(ticket_id = %ticket.id, "cancellation notification failed: {e}");
                }
            }
            if let Err(e) = self
                .notify_service
                .notify_role(
                    UserRole::Admin,
                    "Tickets Auto-Cancelled",
                    &format!("{} tickets cancelled due to SLA breach.", ids.len()),
                )
                .await
            {
                tracing::warn!("admin cancellation digest failed: {e}");
            }
            report.cancelled = ids;
        }

        if !breached.is_empty() {
            let ids: Vec<Uuid> = breached.iter().map(|t| t.id).collect();
            // Escalation boosts urgency without ending the lifecycle; the
            // tickets stay ACCEPTED.
            let affected = self.ticket_repo.escalate_where_accepted(&ids).await?;
            tracing::info!(matched = ids.len(), affected, "escalated tickets past the assign deadline");

            for ticket in &breached {
                if let Err(e) = self
                    .notify_service
                    .notify(
                        ticket.client_id,
                        "Ticket Escalated",
                        &format!(
                            "We are prioritizing your ticket \"{}\" as it has exceeded the standard assignment time.",
                            ticket.title
                        ),
                    )
                    .await
                {
                    tracing::warn!(ticket_id = %ticket.id, "escalation notification failed: {e}");
                }
            }
            if let Err(e) = self
                .notify_service
                .notify_role(
                    UserRole::Admin,
                    "Critical: Tickets Auto-Escalated",
                    &format!(
                        "{} tickets have been moved to high priority (Escalated) due to delay in assignment.",
                        ids.len()
                    ),
                )
                .await
            {
                tracing::warn!("admin escalation digest failed: {e}");
            }
            report.escalated = ids;
        }

        Ok(report)
    }
}
