use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Intake payload for a new ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Outcome of one assignment attempt. The `No*` variants are the expected
/// steady state of a busy or empty shop, not errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned { ticket_id: Uuid, mechanic_id: Uuid },
    NoIdleMechanic,
    NoQueuedTicket,
}

/// What one sweep pass changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    pub cancelled: Vec<Uuid>,
    pub escalated: Vec<Uuid>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.cancelled.is_empty() && self.escalated.is_empty()
    }
}
