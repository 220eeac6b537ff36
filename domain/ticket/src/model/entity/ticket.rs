use std::fmt;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use database_model::ticket;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    model::{
        entity::{Service, Severity},
        vo::NewTicket,
    },
    repository::DbField,
};

/// A repair ticket, the central record of the facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Bound mechanic. Written exactly once, on ACCEPTED -> ASSIGNED.
    pub mechanic_id: Option<Uuid>,
    pub service_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Severity rank snapshot taken at creation, lower is more urgent.
    /// Later severity edits do not reorder existing tickets; only an
    /// explicit admin override changes this.
    pub priority: i32,
    pub cost: Option<f64>,
    pub status: TicketStatus,
    /// One-way flag, never reset once raised.
    pub is_escalated: bool,
    pub is_paid: bool,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<CancelledBy>,
    pub cancellation_reason: Option<String>,
}

#[derive(FromPrimitive, ToPrimitive, Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum TicketStatus {
    /// Created by a client, waiting for an admin to accept.
    #[default]
    Pending,
    /// Accepted, queued for assignment.
    Accepted,
    /// Bound to a mechanic.
    Assigned,
    /// Mechanic started working.
    InProgress,
    /// Terminal.
    Completed,
    /// Terminal, reachable from Pending and Accepted only.
    Cancelled,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Who cancelled a ticket.
#[derive(FromPrimitive, ToPrimitive, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum CancelledBy {
    Client,
    Admin,
    System,
}

#[derive(FromPrimitive, ToPrimitive, Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

impl Ticket {
    /// Build a fresh PENDING ticket, snapshotting the priority from the
    /// service's severity and the cost from the service defaults.
    pub fn create(input: NewTicket, service: &Service, severity: &Severity, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id: input.client_id,
            mechanic_id: None,
            service_id: service.id,
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            priority: severity.priority,
            cost: service.default_cost,
            status: TicketStatus::Pending,
            is_escalated: false,
            is_paid: false,
            payment_method: None,
            created_at: now,
            accepted_at: None,
            assigned_at: None,
            completed_at: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
        }
    }
}

/// Partial update row for tickets.
#[derive(Debug, Clone, Default)]
pub struct DbTicket {
    pub id: Uuid,
    pub mechanic_id: DbField<Option<Uuid>>,
    pub priority: DbField<i32>,
    pub cost: DbField<Option<f64>>,
    pub status: DbField<TicketStatus>,
    pub is_escalated: DbField<bool>,
    pub is_paid: DbField<bool>,
    pub payment_method: DbField<Option<PaymentMethod>>,
    pub accepted_at: DbField<Option<DateTime<Utc>>>,
    pub assigned_at: DbField<Option<DateTime<Utc>>>,
    pub completed_at: DbField<Option<DateTime<Utc>>>,
    pub cancelled_at: DbField<Option<DateTime<Utc>>>,
    pub cancelled_by: DbField<Option<CancelledBy>>,
    pub cancellation_reason: DbField<Option<String>>,
}

impl TryFrom<ticket::Model> for Ticket {
    type Error = anyhow::Error;

    fn try_from(model: ticket::Model) -> Result<Self, Self::Error> {
        let ticket::Model {
            id,
            client_id,
            mechanic_id,
            service_id,
            title,
            description,
            image_url,
            priority,
            cost,
            status,
            is_escalated,
            is_paid,
            payment_method,
            created_at,
            accepted_at,
            assigned_at,
            completed_at,
            cancelled_at,
            cancelled_by,
            cancellation_reason,
        } = model;

        Ok(Self {
            id,
            client_id,
            mechanic_id,
            service_id,
            title,
            description,
            image_url,
            priority,
            cost,
            status: TicketStatus::from_i32(status).ok_or(anyhow!("Wrong ticket status"))?,
            is_escalated,
            is_paid,
            payment_method: payment_method
                .map(|v| PaymentMethod::from_i32(v).ok_or(anyhow!("Wrong payment method")))
                .transpose()?,
            created_at,
            accepted_at,
            assigned_at,
            completed_at,
            cancelled_at,
            cancelled_by: cancelled_by
                .map(|v| CancelledBy::from_i32(v).ok_or(anyhow!("Wrong cancelled_by value")))
                .transpose()?,
            cancellation_reason,
        })
    }
}
