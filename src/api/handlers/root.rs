use axum::response::IntoResponse;

pub async fn fallback() -> impl IntoResponse {
    "Server up and running."
}
