use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{TeamMember, TeamStatus},
    error::{AppError, Result},
    store::{Filter, Patch},
};

const TEAM: &str = "team";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamForm {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub async fn submit_team_form(
    State(state): State<AppState>,
    Json(form): Json<TeamForm>,
) -> Result<Json<Value>> {
    let member = TeamMember {
        full_name: form.full_name,
        address: form.address,
        phone_number: form.phone_number,
        email: form.email,
        role: form.role,
        status: TeamStatus::Pending,
        created_at: Utc::now(),
    };

    let id = state.store.insert(TEAM, &member).await?;
    tracing::info!(%id, "team signup submitted");

    Ok(Json(json!({
        "message": "Form submitted successfully",
        "insertedId": id,
    })))
}

/// Accepting is idempotent: re-accepting an accepted member rewrites
/// the same status and still reports success.
pub async fn accept_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let patch = Patch::new().set("status", TeamStatus::Accepted.as_str());

    let matched = state.store.update_by_id(TEAM, id, &patch).await?;
    if matched == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(%id, "team request accepted");
    Ok(Json(json!({ "message": "Request accepted successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub status: Option<String>,
    pub email: Option<String>,
}

/// Listing view deliberately omits the status field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberView {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn get_team_members(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<Vec<TeamMemberView>>> {
    let mut filter = Filter::new();
    // Only the two known statuses narrow the listing; anything else
    // falls through to an unfiltered read.
    if let Some(status) = query.status.as_deref() {
        if status == "pending" || status == "accepted" {
            filter = filter.eq("status", status);
        }
    }
    if let Some(email) = query.email {
        filter = filter.eq("email", email);
    }

    let members = state
        .store
        .find(TEAM, &filter, None)
        .await?
        .into_iter()
        .map(|doc| {
            let member = doc.into_typed::<TeamMember>()?;
            Ok(TeamMemberView {
                id: member.id,
                full_name: member.doc.full_name,
                email: member.doc.email,
                address: member.doc.address,
                phone_number: member.doc.phone_number,
                role: member.doc.role,
                created_at: member.doc.created_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(members))
}

pub async fn delete_team_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let deleted = state.store.delete_by_id(TEAM, id, None).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Team member not found".to_string()));
    }

    tracing::info!(%id, "team member deleted");
    Ok(Json(json!({ "message": "Team member deleted successfully" })))
}

/// Rejection only applies while the record is still pending, so an
/// already-accepted member cannot be rejected; the filtered delete
/// matches nothing and reports not-found.
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let pending_only = Filter::new().eq("status", TeamStatus::Pending.as_str());

    let deleted = state.store.delete_by_id(TEAM, id, Some(&pending_only)).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Pending request not found".to_string()));
    }

    tracing::info!(%id, "team request rejected");
    Ok(Json(json!({ "message": "Request rejected successfully" })))
}
