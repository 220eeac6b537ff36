use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::user::UserRole;

/// Outbound notification intents. Fire-and-forget: callers log failures and
/// never let them roll back the state change that triggered them.
#[async_trait]
pub trait NotifyService: Send + Sync {
    async fn notify(&self, user_id: Uuid, title: &str, body: &str) -> anyhow::Result<()>;

    /// One message fanned out to every user holding `role`.
    async fn notify_role(&self, role: UserRole, title: &str, body: &str) -> anyhow::Result<()>;
}
