use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    domain::{AdminReply, BroadcastMessage, ContactMessage},
    error::Result,
    store::{Filter, Pipeline, Projection, Sort, Stored},
};

const CONTACTS: &str = "contacts";
const ADMIN_MESSAGES: &str = "admin_messages";
const BROADCAST_MESSAGES: &str = "broadcast_messages";

const NO_REPLY_SENTINEL: &str = "No reply found for the given email";

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

pub async fn submit_contact_form(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<Value>> {
    let message = ContactMessage {
        name: form.name,
        email: form.email,
        phone: form.phone,
        message: form.message,
        created_at: Utc::now(),
    };

    let id = state.store.insert(CONTACTS, &message).await?;
    tracing::info!(%id, "contact form submitted");

    Ok(Json(json!({ "message": "Form submitted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponseForm {
    pub user_message_id: Option<String>,
    pub user_email: Option<String>,
    pub admin_response: Option<String>,
}

pub async fn save_admin_response(
    State(state): State<AppState>,
    Json(form): Json<AdminResponseForm>,
) -> Result<Json<Value>> {
    let reply = AdminReply {
        user_message_id: form.user_message_id,
        user_email: form.user_email,
        admin_message: form.admin_response,
        created_at: Utc::now(),
    };

    let id = state.store.insert(ADMIN_MESSAGES, &reply).await?;
    tracing::info!(%id, "admin response saved");

    Ok(Json(json!({ "message": "Admin response saved successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct BroadcastForm {
    pub message: Option<String>,
}

pub async fn submit_admin_broadcast(
    State(state): State<AppState>,
    Json(form): Json<BroadcastForm>,
) -> Result<Json<Value>> {
    let broadcast = BroadcastMessage {
        message: form.message,
        created_at: Utc::now(),
    };

    let id = state.store.insert(BROADCAST_MESSAGES, &broadcast).await?;
    tracing::info!(%id, "broadcast message submitted");

    Ok(Json(json!({ "message": "Broadcast message submitted successfully" })))
}

pub async fn get_contact_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<ContactMessage>>>> {
    let messages = state
        .store
        .find(CONTACTS, &Filter::new(), None)
        .await?
        .into_iter()
        .map(|doc| doc.into_typed())
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(messages))
}

#[derive(Debug, Deserialize)]
pub struct AdminReplyQuery {
    pub email: Option<String>,
}

/// Latest reply for an email, or the sentinel string when none exists.
/// The sentinel is a 200-level value, not an error.
pub async fn get_admin_reply(
    State(state): State<AppState>,
    Query(query): Query<AdminReplyQuery>,
) -> Result<Json<Value>> {
    let email = query.email.unwrap_or_default();

    let reply = state
        .store
        .find_one(
            ADMIN_MESSAGES,
            &Filter::new().eq("user_email", email),
            &Sort::desc("created_at"),
        )
        .await?;

    let body = match reply {
        Some(doc) => {
            let reply: Stored<AdminReply> = doc.into_typed()?;
            json!({ "adminReply": reply.doc.admin_message })
        }
        None => json!({ "adminReply": NO_REPLY_SENTINEL }),
    };

    Ok(Json(body))
}

/// Join view over contact messages and admin replies: each message
/// carries the newest reply addressed to it (by `created_at`) as
/// `admin_message`, absent when no reply exists. Newest messages first.
pub async fn get_user_messages_with_admin_responses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>> {
    let pipeline = Pipeline::new()
        .lookup(ADMIN_MESSAGES, "id", "user_message_id", "admin_responses")
        .project(
            Projection::keep(["id", "name", "email", "message", "created_at"])
                .newest_of("admin_responses", "created_at", "admin_message", "admin_message"),
        )
        .sort_desc("created_at");

    let messages = state.store.aggregate(CONTACTS, &pipeline).await?;

    Ok(Json(messages))
}

pub async fn get_admin_broadcast_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<BroadcastMessage>>>> {
    let messages = state
        .store
        .find(BROADCAST_MESSAGES, &Filter::new(), Some(&Sort::desc("created_at")))
        .await?
        .into_iter()
        .map(|doc| doc.into_typed())
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(messages))
}
