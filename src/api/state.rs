use std::sync::Arc;

use crate::{
    config::Settings,
    error::{AppError, Result},
    media::MediaGateway,
    store::DocumentStore,
};

/// Process-wide handles, constructed once in `main` and injected into
/// every handler through the router state. The media gateway is absent
/// when its credentials were not configured; file-bearing routes then
/// fail per-call rather than at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub media: Option<Arc<dyn MediaGateway>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        store: Arc<DocumentStore>,
        media: Option<Arc<dyn MediaGateway>>,
        settings: Arc<Settings>,
    ) -> Self {
        Self { store, media, settings }
    }

    pub fn media(&self) -> Result<&Arc<dyn MediaGateway>> {
        self.media.as_ref().ok_or_else(|| {
            AppError::Upload("media upload service is not configured".to_string())
        })
    }
}
