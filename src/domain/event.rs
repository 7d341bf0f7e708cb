use serde::{Deserialize, Serialize};

/// A listed event. The image is optional on create and update; when no
/// new image is sent on update the stored URL is kept as-is. Date and
/// time fields are caller-supplied strings, stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub brief: Option<String>,
    pub image_url: Option<String>,
}
