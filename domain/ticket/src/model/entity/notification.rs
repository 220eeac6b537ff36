use chrono::{DateTime, Utc};
use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted notification intent. Delivery to the client device is an
/// external concern; this row is the durable record of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Default, FromPrimitive, ToPrimitive, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Info,
    Alert,
}

impl Notification {
    pub fn create(user_id: Uuid, title: &str, message: &str, kind: NotificationKind, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_owned(),
            message: message.to_owned(),
            kind,
            is_read: false,
            created_at: now,
        }
    }
}
