use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::Volunteer,
    error::{AppError, Result},
    store::{Filter, Stored},
};

const VOLUNTEERS: &str = "volunteers";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerForm {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub volunteer_for: Option<String>,
}

pub async fn submit_volunteer_form(
    State(state): State<AppState>,
    Json(form): Json<VolunteerForm>,
) -> Result<Json<Value>> {
    let volunteer = Volunteer {
        full_name: form.full_name,
        address: form.address,
        phone_number: form.phone_number,
        email: form.email,
        volunteer_for: form.volunteer_for,
        submission_date: Utc::now(),
    };

    let id = state.store.insert(VOLUNTEERS, &volunteer).await?;
    tracing::info!(%id, "volunteer form submitted");

    Ok(Json(json!({
        "message": "Form submitted successfully",
        "id": id,
    })))
}

pub async fn get_volunteers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<Volunteer>>>> {
    let volunteers = state
        .store
        .find(VOLUNTEERS, &Filter::new(), None)
        .await?
        .into_iter()
        .map(|doc| doc.into_typed())
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(volunteers))
}

pub async fn delete_volunteer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let deleted = state.store.delete_by_id(VOLUNTEERS, id, None).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Volunteer not found".to_string()));
    }

    tracing::info!(%id, "volunteer deleted");
    Ok(Json(json!({ "message": "Volunteer deleted successfully" })))
}
