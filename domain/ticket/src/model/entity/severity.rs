use chrono::{DateTime, Duration, Utc};
use database_model::severity;
use serde::{Deserialize, Serialize};

/// Static urgency classification carrying the SLA bounds. Reference data;
/// tickets copy what they need from it at creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Severity {
    pub id: i32,
    pub name: String,
    /// Rank, lower is more urgent.
    pub priority: i32,
    pub max_accept_minutes: i64,
    pub max_assign_minutes: i64,
    pub color: String,
    pub description: Option<String>,
}

impl Severity {
    /// Latest instant a ticket of this severity may stay PENDING.
    pub fn accept_deadline(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::minutes(self.max_accept_minutes)
    }

    /// Latest instant a ticket of this severity may wait for a mechanic.
    pub fn assign_deadline(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::minutes(self.max_assign_minutes)
    }
}

impl From<severity::Model> for Severity {
    fn from(model: severity::Model) -> Self {
        let severity::Model {
            id,
            name,
            priority,
            max_accept_minutes,
            max_assign_minutes,
            color,
            description,
        } = model;

        Self {
            id,
            name,
            priority,
            max_accept_minutes,
            max_assign_minutes,
            color,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadlines_offset_creation_time_by_policy_minutes() {
        let severity = Severity {
            max_accept_minutes: 30,
            max_assign_minutes: 90,
            ..Default::default()
        };
        let created = Utc::now();
        assert_eq!(severity.accept_deadline(created) - created, Duration::minutes(30));
        assert_eq!(severity.assign_deadline(created) - created, Duration::minutes(90));
    }
}
