use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::entity::{
    user::{DbUser, UserRole},
    User,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn get_by_role(&self, role: UserRole) -> anyhow::Result<Vec<User>>;

    /// ACTIVE mechanics with a free slot, oldest `last_assigned_at` first
    /// (never-assigned mechanics lead).
    async fn get_idle_mechanics(&self) -> anyhow::Result<Vec<User>>;

    async fn update(&self, patch: DbUser) -> anyhow::Result<()>;

    /// Claim the mechanic's single task slot (`assigned_count` 0 -> 1) and
    /// stamp `last_assigned_at`, conditioned on the mechanic still being an
    /// ACTIVE, idle mechanic. False when the slot was raced away.
    async fn try_occupy_slot(&self, id: Uuid, now: DateTime<Utc>) -> anyhow::Result<bool>;

    /// Release the slot (1 -> 0). False when it was already free.
    async fn release_slot(&self, id: Uuid) -> anyhow::Result<bool>;
}
