use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::{forms::FormData, state::AppState},
    domain::GalleryItem,
    error::{AppError, Result},
    media::MediaKind,
    store::{Filter, Stored},
};

const GALLERY: &str = "gallery";
const GALLERY_FOLDER: &str = "gallery";

/// The media file is the one required part in the whole API surface:
/// without it there is nothing to host, so the request is rejected
/// before any gateway call. The stored media type is whatever the host
/// detected, never caller input.
pub async fn upload_media(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let mut form = FormData::collect(multipart).await?;

    let Some(file) = form.take_file("media") else {
        return Err(AppError::BadRequest("No media file uploaded".to_string()));
    };

    let uploaded = state
        .media()?
        .upload(file.data, MediaKind::Auto, Some(GALLERY_FOLDER))
        .await?;

    let item = GalleryItem {
        title: form.text("title"),
        media_url: Some(uploaded.url.clone()),
        media_type: Some(uploaded.resource_type),
        upload_date: form.text("date"),
    };

    let id = state.store.insert(GALLERY, &item).await?;
    tracing::info!(%id, "gallery media uploaded");

    Ok(Json(json!({
        "message": "Media uploaded successfully!",
        "id": id,
        "mediaUrl": uploaded.url,
    })))
}

pub async fn get_media(State(state): State<AppState>) -> Result<Json<Vec<Stored<GalleryItem>>>> {
    let media = state
        .store
        .find(GALLERY, &Filter::new(), None)
        .await?
        .into_iter()
        .map(|doc| doc.into_typed())
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(media))
}

pub async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    // The remote object is left in place; only the local record goes.
    let deleted = state.store.delete_by_id(GALLERY, id, None).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Media not found".to_string()));
    }

    tracing::info!(%id, "gallery media deleted");
    Ok(Json(json!({ "message": "Media deleted successfully" })))
}
