use anyhow::anyhow;
use chrono::{DateTime, Utc};
use database_model::user;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repository::DbField;

/// An account. Mechanics are users with [`UserRole::Mechanic`]; their
/// availability and single task slot live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: UserRole,
    /// Punched in (Active) or out (Disabled).
    pub status: UserStatus,
    /// Slots in use, 0 or 1. Guarded by the conditional occupy/release
    /// updates, never written directly.
    pub assigned_count: i32,
    /// Round-robin tiebreak; oldest idle mechanic is served first.
    pub last_assigned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_idle_mechanic(&self) -> bool {
        matches!(self.role, UserRole::Mechanic)
            && matches!(self.status, UserStatus::Active)
            && self.assigned_count == 0
    }
}

#[derive(Default, FromPrimitive, ToPrimitive, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[default]
    Client,
    Mechanic,
    Admin,
}

#[derive(Default, FromPrimitive, ToPrimitive, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    Active,
    Disabled,
}

/// Partial update row for users.
#[derive(Debug, Clone, Default)]
pub struct DbUser {
    pub id: Uuid,
    pub status: DbField<UserStatus>,
    pub assigned_count: DbField<i32>,
    pub last_assigned_at: DbField<Option<DateTime<Utc>>>,
}

impl TryFrom<user::Model> for User {
    type Error = anyhow::Error;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        let user::Model {
            id,
            name,
            email,
            mobile,
            role,
            status,
            assigned_count,
            last_assigned_at,
            created_at,
        } = model;

        Ok(Self {
            id,
            name,
            email,
            mobile,
            role: UserRole::from_i32(role).ok_or(anyhow!("Wrong user role"))?,
            status: UserStatus::from_i32(status).ok_or(anyhow!("Wrong user status"))?,
            assigned_count,
            last_assigned_at,
            created_at,
        })
    }
}
