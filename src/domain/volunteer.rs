use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A volunteer signup. Create, list and delete only; never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub volunteer_for: Option<String>,
    pub submission_date: DateTime<Utc>,
}
