use serde::{Deserialize, Serialize};

/// A generic content-feed entry. Image and video attachments are
/// independent and both optional; `upload_time` is caller-supplied and
/// stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub body: Option<String>,
    pub upload_time: Option<String>,
    pub image_path: Option<String>,
    pub video_url: Option<String>,
}
