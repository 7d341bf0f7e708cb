use async_trait::async_trait;

use crate::error::Result;

pub mod cloudinary;

pub use cloudinary::CloudinaryClient;

/// Which remote resource type an upload should be stored as. `Auto`
/// defers detection to the media host; callers must read the detected
/// type back from the result rather than assume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Auto,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Durable retrieval URL at the media host.
    pub url: String,
    /// Resource type as detected by the host ("image", "video", ...).
    pub resource_type: String,
}

/// Gateway to the external media host. Uploads are single-attempt:
/// failure surfaces as an upload error with no retry, and successfully
/// uploaded objects are never deleted when the local record referencing
/// them goes away.
#[async_trait]
pub trait MediaGateway: Send + Sync {
    async fn upload(
        &self,
        data: Vec<u8>,
        kind: MediaKind,
        folder: Option<&str>,
    ) -> Result<UploadedMedia>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use fake::FakeMediaGateway;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::Result;

    use super::{MediaGateway, MediaKind, UploadedMedia};

    #[derive(Debug, Clone)]
    pub struct RecordedUpload {
        pub kind: MediaKind,
        pub folder: Option<String>,
        pub size: usize,
    }

    /// In-memory stand-in for the media host. Returns deterministic
    /// URLs and resolves `Auto` to `image`.
    #[derive(Default)]
    pub struct FakeMediaGateway {
        uploads: Mutex<Vec<RecordedUpload>>,
    }

    impl FakeMediaGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn uploads(&self) -> Vec<RecordedUpload> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaGateway for FakeMediaGateway {
        async fn upload(
            &self,
            data: Vec<u8>,
            kind: MediaKind,
            folder: Option<&str>,
        ) -> Result<UploadedMedia> {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(RecordedUpload {
                kind,
                folder: folder.map(str::to_string),
                size: data.len(),
            });

            let resource_type = match kind {
                MediaKind::Video => "video",
                MediaKind::Image | MediaKind::Auto => "image",
            };

            Ok(UploadedMedia {
                url: format!(
                    "https://media.invalid/{}/upload-{}",
                    folder.unwrap_or("root"),
                    uploads.len()
                ),
                resource_type: resource_type.to_string(),
            })
        }
    }
}
