use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team signup request. Records start `pending`; acceptance flips the
/// status to `accepted`, rejection deletes the record while it is still
/// pending. There is no third status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    Pending,
    Accepted,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::Pending => "pending",
            TeamStatus::Accepted => "accepted",
        }
    }
}
