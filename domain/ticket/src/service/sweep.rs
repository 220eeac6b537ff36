use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::vo::SweepReport;

/// Periodic SLA-breach scan. One call is one full pass over the open
/// tickets; the caller owns the schedule and the clock.
#[async_trait]
pub trait SlaSweepService: Send + Sync {
    /// Cancel PENDING tickets past their accept deadline, escalate ACCEPTED
    /// tickets past their assign deadline. Each sub-step is idempotent:
    /// rerunning with the same `now` changes nothing.
    async fn run_sweep_once(&self, now: DateTime<Utc>) -> anyhow::Result<SweepReport>;
}
