use std::{sync::Arc, time::Duration};

use chrono::Utc;
use domain_ticket::service::SlaSweepService;
use tokio::time::interval;
use tracing::Instrument;

/// Drives the SLA sweep on a fixed interval. A failed pass is logged and
/// retried on the next tick; the scan recomputes from persisted state each
/// run, so nothing needs to be replayed.
pub struct IntervalRunner {
    sweep_service: Arc<dyn SlaSweepService>,
    interval: Duration,
}

impl IntervalRunner {
    pub fn new(interval_seconds: u64, sweep_service: Arc<dyn SlaSweepService>) -> Self {
        Self {
            sweep_service,
            interval: Duration::from_secs(interval_seconds),
        }
    }

    pub async fn run(&self) {
        let mut interval = interval(self.interval);
        loop {
            interval.tick().await;
            let sweep_service = self.sweep_service.clone();
            tokio::spawn(
                async move {
                    match sweep_service.run_sweep_once(Utc::now()).await {
                        Ok(report) if !report.is_empty() => {
                            tracing::info!(
                                cancelled = report.cancelled.len(),
                                escalated = report.escalated.len(),
                                "sweep pass applied changes"
                            );
                        }
                        Ok(_) => tracing::trace!("sweep pass found nothing to do"),
                        Err(e) => tracing::error!("sweep pass failed: {e:#}"),
                    }
                }
                .instrument(tracing::trace_span!("sla_sweep")),
            );
        }
    }
}
