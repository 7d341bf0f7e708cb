use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::DateTime;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::{forms::FormData, state::AppState},
    domain::ContentItem,
    error::{AppError, Result},
    media::MediaKind,
    store::{Filter, Patch, Stored},
};

const CONTENT: &str = "content";
const IMAGE_FOLDER: &str = "content-images";
const VIDEO_FOLDER: &str = "content-videos";

/// Image and video attachments are independent; each present file is
/// relayed to the media host before the record is written. Uploads are
/// not rolled back if the insert fails.
pub async fn save_content(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let mut form = FormData::collect(multipart).await?;

    let image_path = match form.take_file("image") {
        Some(file) => {
            let uploaded = state
                .media()?
                .upload(file.data, MediaKind::Image, Some(IMAGE_FOLDER))
                .await?;
            Some(uploaded.url)
        }
        None => None,
    };

    let video_url = match form.take_file("video") {
        Some(file) => {
            let uploaded = state
                .media()?
                .upload(file.data, MediaKind::Video, Some(VIDEO_FOLDER))
                .await?;
            Some(uploaded.url)
        }
        None => None,
    };

    let content = ContentItem {
        full_name: form.text("fullName"),
        title: form.text("title"),
        date_time: form.text("dateTime"),
        body: form.text("body"),
        upload_time: form.text("uploadTime"),
        image_path,
        video_url,
    };

    let id = state.store.insert(CONTENT, &content).await?;
    tracing::info!(%id, "content saved");

    Ok(Json(json!({ "message": "Content saved successfully!", "id": id })))
}

pub async fn update_content(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let mut form = FormData::collect(multipart).await?;

    let id = form
        .text("id")
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid content id".to_string()))?;

    let image_path = match form.take_file("image") {
        Some(file) => {
            let uploaded = state
                .media()?
                .upload(file.data, MediaKind::Image, Some(IMAGE_FOLDER))
                .await?;
            Some(uploaded.url)
        }
        None => None,
    };

    let video_url = match form.take_file("video") {
        Some(file) => {
            let uploaded = state
                .media()?
                .upload(file.data, MediaKind::Video, Some(VIDEO_FOLDER))
                .await?;
            Some(uploaded.url)
        }
        None => None,
    };

    let patch = Patch::new()
        .maybe_set("fullName", form.text("fullName"))
        .maybe_set("title", form.text("title"))
        .maybe_set("dateTime", form.text("dateTime"))
        .maybe_set("body", form.text("body"))
        .maybe_set("uploadTime", form.text("uploadTime"))
        .maybe_set("imagePath", image_path.clone())
        .maybe_set("videoUrl", video_url.clone());

    let matched = state.store.update_by_id(CONTENT, id, &patch).await?;
    if matched == 0 {
        return Err(AppError::NotFound("Content not found".to_string()));
    }

    tracing::info!(%id, "content updated");

    Ok(Json(json!({
        "message": "Content updated successfully!",
        "imagePath": image_path,
        "videoUrl": video_url,
    })))
}

pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let deleted = state.store.delete_by_id(CONTENT, id, None).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Content not found".to_string()));
    }

    tracing::info!(%id, "content deleted");
    Ok(Json(json!({ "message": "Content deleted successfully" })))
}

/// Listing reshapes `dateTime` down to its date part; everything else
/// is returned as stored.
pub async fn get_content(State(state): State<AppState>) -> Result<Json<Vec<Stored<ContentItem>>>> {
    let content = state
        .store
        .find(CONTENT, &Filter::new(), None)
        .await?
        .into_iter()
        .map(|doc| {
            let mut item = doc.into_typed::<ContentItem>()?;
            item.doc.date_time = item.doc.date_time.map(|raw| date_only(&raw));
            Ok(item)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(content))
}

fn date_only(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        // Not a full timestamp; keep whatever precedes the time marker.
        Err(_) => raw.split('T').next().unwrap_or(raw).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::date_only;

    #[test]
    fn date_only_handles_timestamps_and_plain_dates() {
        assert_eq!(date_only("2025-06-01T14:30:00Z"), "2025-06-01");
        assert_eq!(date_only("2025-06-01T14:30:00+02:00"), "2025-06-01");
        assert_eq!(date_only("2025-06-01"), "2025-06-01");
    }
}
