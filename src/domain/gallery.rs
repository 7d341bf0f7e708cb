use serde::{Deserialize, Serialize};

/// A hosted gallery entry. `media_type` comes from the upload gateway's
/// detection, never from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub title: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub upload_date: Option<String>,
}
