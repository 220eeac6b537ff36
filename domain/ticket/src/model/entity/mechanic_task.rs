use chrono::{DateTime, Utc};
use database_model::mechanic_task;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repository::DbField;

/// The work record bound to a ticket's assignment. Created on
/// ACCEPTED -> ASSIGNED, kept forever for history; at most one per ticket
/// is open (`completed_at == None`) at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanicTask {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub mechanic_id: Uuid,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub parts_used: Vec<PartUsed>,
    pub created_at: DateTime<Utc>,
}

/// One consumed inventory line. Stored as a JSON list on the task row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartUsed {
    pub inventory_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: f64,
}

impl MechanicTask {
    pub fn create(ticket_id: Uuid, mechanic_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            mechanic_id,
            started_at: None,
            completed_at: None,
            notes: None,
            parts_used: Vec::new(),
            created_at: now,
        }
    }

    /// Record consumed parts: a line for an inventory id already on the task
    /// adds to its quantity, unknown ids are appended in order. Lines with a
    /// non-positive quantity are ignored.
    pub fn add_parts(&mut self, items: Vec<PartUsed>) {
        for item in items {
            if item.quantity <= 0 {
                continue;
            }
            match self.parts_used.iter_mut().find(|p| p.inventory_id == item.inventory_id) {
                Some(existing) => existing.quantity += item.quantity,
                None => self.parts_used.push(item),
            }
        }
    }
}

/// Partial update row for mechanic tasks.
#[derive(Debug, Clone, Default)]
pub struct DbMechanicTask {
    pub id: Uuid,
    pub started_at: DbField<Option<DateTime<Utc>>>,
    pub completed_at: DbField<Option<DateTime<Utc>>>,
    pub notes: DbField<Option<String>>,
    pub parts_used: DbField<Vec<PartUsed>>,
}

impl TryFrom<mechanic_task::Model> for MechanicTask {
    type Error = anyhow::Error;

    fn try_from(model: mechanic_task::Model) -> Result<Self, Self::Error> {
        let mechanic_task::Model {
            id,
            ticket_id,
            mechanic_id,
            started_at,
            completed_at,
            notes,
            parts_used,
            created_at,
        } = model;

        Ok(Self {
            id,
            ticket_id,
            mechanic_id,
            started_at,
            completed_at,
            notes,
            parts_used: serde_json::from_value(parts_used)?,
            created_at,
        })
    }
}
