use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_ticket::{
    model::entity::{
        notification::NotificationKind,
        user::UserRole,
        Notification,
    },
    repository::{NotificationRepo, UserRepo},
    service::NotifyService,
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Persists one notification row per recipient and logs the intent. The
/// push transport picks rows up outside this process.
#[derive(TypedBuilder)]
pub struct PersistingNotifier {
    user_repo: Arc<dyn UserRepo>,
    notification_repo: Arc<dyn NotificationRepo>,
}

#[async_trait]
impl NotifyService for PersistingNotifier {
    async fn notify(&self, user_id: Uuid, title: &str, body: &str) -> anyhow::Result<()> {
        self.notification_repo
            .insert(&Notification::create(user_id, title, body, NotificationKind::Info, Utc::now()))
            .await?;
        tracing::info!(%user_id, title, "notification recorded");
        Ok(())
    }

    async fn notify_role(&self, role: UserRole, title: &str, body: &str) -> anyhow::Result<()> {
        let recipients = self.user_repo.get_by_role(role.to_owned()).await?;
        for user in &recipients {
            self.notification_repo
                .insert(&Notification::create(user.id, title, body, NotificationKind::Alert, Utc::now()))
                .await?;
        }
        tracing::info!(?role, title, count = recipients.len(), "group notification recorded");
        Ok(())
    }
}
