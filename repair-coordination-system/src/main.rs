//! Background worker of the service center: runs the periodic SLA sweep
//! against the shared database. The trigger surface (accept, cancel, punch
//! in/out, ...) is consumed as a library by the request-handling deployment.

mod background_service;
mod config;
mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use domain_ticket::{
    repository::{NotificationRepo, TicketRepo, UserRepo},
    service::{NotifyService, SlaSweepService},
};
use sea_orm::Database;
use service_ticket::SlaSweepServiceImpl;
use tracing_subscriber::EnvFilter;

use crate::{
    background_service::IntervalRunner,
    config::CoordinatorConfig,
    infrastructure::{database::OrmRepo, notify::PersistingNotifier},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = CoordinatorConfig::load()?;
    let db = Database::connect(&config.db.url).await.context("database connection failed")?;
    let repo = Arc::new(OrmRepo::builder().db(Arc::new(db)).build());

    let ticket_repo: Arc<dyn TicketRepo> = repo.clone();
    let user_repo: Arc<dyn UserRepo> = repo.clone();
    let notification_repo: Arc<dyn NotificationRepo> = repo;

    let notify_service: Arc<dyn NotifyService> = Arc::new(
        PersistingNotifier::builder()
            .user_repo(user_repo)
            .notification_repo(notification_repo)
            .build(),
    );
    let sweep_service: Arc<dyn SlaSweepService> = Arc::new(
        SlaSweepServiceImpl::builder()
            .ticket_repo(ticket_repo)
            .notify_service(notify_service)
            .build(),
    );

    let runner = IntervalRunner::new(config.sweep.interval_seconds, sweep_service);
    tracing::info!(interval_seconds = config.sweep.interval_seconds, "SLA sweep runner started");

    tokio::select! {
        _ = runner.run() => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown signal received"),
    }
    Ok(())
}
