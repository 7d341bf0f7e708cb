use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A public contact-form submission. Nothing is validated: absent
/// fields are stored as null, and the record is never updated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An administrator's reply to a contact message. Append-only; the
/// newest reply per email (by `created_at`) is the authoritative one.
/// `user_message_id` references a `ContactMessage` identifier but is
/// not referentially enforced, so orphaned replies are possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminReply {
    pub user_message_id: Option<String>,
    pub user_email: Option<String>,
    pub admin_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A global announcement, not addressed to any particular user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
