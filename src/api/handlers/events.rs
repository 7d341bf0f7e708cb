use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::{forms::FormData, state::AppState},
    domain::Event,
    error::{AppError, Result},
    media::MediaKind,
    store::{Filter, Patch, Stored},
};

const EVENTS: &str = "events";

/// Create an event from a multipart form. The image part is optional;
/// when present it is relayed to the media host first and the returned
/// URL is stored with the record. A failed insert after a successful
/// upload leaves the remote object orphaned.
pub async fn save_event(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let mut form = FormData::collect(multipart).await?;

    let image_url = match form.take_file("image") {
        Some(file) => {
            let uploaded = state.media()?.upload(file.data, MediaKind::Auto, None).await?;
            Some(uploaded.url)
        }
        None => None,
    };

    let event = Event {
        title: form.text("title"),
        date_time: form.text("dateTime"),
        time: form.text("time"),
        location: form.text("location"),
        description: form.text("description"),
        brief: form.text("brief"),
        image_url,
    };

    let id = state.store.insert(EVENTS, &event).await?;
    tracing::info!(%id, "event saved");

    let mut body = json!({ "message": "Event saved successfully!", "id": id });
    if let Some(url) = &event.image_url {
        body["imageUrl"] = json!(url);
    }

    Ok(Json(body))
}

/// Partial update: only fields present in the form overwrite stored
/// values, and the image URL changes only when a new file was sent.
pub async fn update_event(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let mut form = FormData::collect(multipart).await?;

    let id = form
        .text("id")
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid event id".to_string()))?;

    let image_url = match form.take_file("image") {
        Some(file) => {
            let uploaded = state.media()?.upload(file.data, MediaKind::Auto, None).await?;
            Some(uploaded.url)
        }
        None => None,
    };

    let patch = Patch::new()
        .maybe_set("title", form.text("title"))
        .maybe_set("dateTime", form.text("dateTime"))
        .maybe_set("time", form.text("time"))
        .maybe_set("location", form.text("location"))
        .maybe_set("description", form.text("description"))
        .maybe_set("brief", form.text("brief"))
        .maybe_set("imageUrl", image_url.clone());

    let matched = state.store.update_by_id(EVENTS, id, &patch).await?;
    if matched == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(%id, "event updated");

    let mut body = json!({ "message": "Event updated successfully!" });
    if let Some(url) = &image_url {
        body["imageUrl"] = json!(url);
    }

    Ok(Json(body))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let deleted = state.store.delete_by_id(EVENTS, id, None).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(%id, "event deleted");
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}

pub async fn get_events(State(state): State<AppState>) -> Result<Json<Vec<Stored<Event>>>> {
    let events = state
        .store
        .find(EVENTS, &Filter::new(), None)
        .await?
        .into_iter()
        .map(|doc| doc.into_typed())
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(events))
}
