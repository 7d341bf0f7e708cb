pub mod forms;
pub mod handlers;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Mounts every resource handler flat under the root namespace, with a
/// catch-all health response. Handlers never call each other; all
/// shared state travels through `AppState`.
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        // Contact form, admin replies, broadcasts
        .route("/submit-contact-form", post(handlers::contact::submit_contact_form))
        .route("/save-admin-response", post(handlers::contact::save_admin_response))
        .route("/submit-admin-broadcast", post(handlers::contact::submit_admin_broadcast))
        .route("/get-contact-messages", get(handlers::contact::get_contact_messages))
        .route("/get-admin-reply", get(handlers::contact::get_admin_reply))
        .route(
            "/get-user-messages-with-admin-responses",
            get(handlers::contact::get_user_messages_with_admin_responses),
        )
        .route(
            "/get-admin-broadcast-messages",
            get(handlers::contact::get_admin_broadcast_messages),
        )
        // Team signup workflow
        .route("/submit-team-form", put(handlers::team::submit_team_form))
        .route("/accept-request/:id", post(handlers::team::accept_request))
        .route("/get-team-members", get(handlers::team::get_team_members))
        .route("/delete-team-member/:id", delete(handlers::team::delete_team_member))
        .route("/reject-request/:id", delete(handlers::team::reject_request))
        // Volunteer signup
        .route("/submit-volunteer-form", put(handlers::volunteer::submit_volunteer_form))
        .route("/get-volunteers", get(handlers::volunteer::get_volunteers))
        .route("/delete-volunteer/:id", delete(handlers::volunteer::delete_volunteer))
        // Events listing
        .route("/save-event", put(handlers::events::save_event))
        .route("/update-event", post(handlers::events::update_event))
        .route("/delete-event/:id", delete(handlers::events::delete_event))
        .route("/get-events", get(handlers::events::get_events))
        // Media gallery
        .route("/upload-media", post(handlers::gallery::upload_media))
        .route("/get-media", get(handlers::gallery::get_media))
        .route("/delete-media/:id", delete(handlers::gallery::delete_media))
        // Content feed
        .route("/save-content", put(handlers::content::save_content))
        .route("/update-content", post(handlers::content::update_content))
        .route("/delete-content/:id", delete(handlers::content::delete_content))
        .route("/get-content", get(handlers::content::get_content))
        // Everything else answers with a plain liveness message
        .fallback(handlers::root::fallback)
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}
