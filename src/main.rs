use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outreach::{
    api::{self, state::AppState},
    config::Settings,
    media::{CloudinaryClient, MediaGateway},
    store::DocumentStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outreach=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Outreach server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let store = Arc::new(DocumentStore::new(db_pool));

    // Media host credentials are optional: without them the server
    // still starts, and file-bearing routes fail per-call.
    let media: Option<Arc<dyn MediaGateway>> =
        match CloudinaryClient::from_config(&settings.cloudinary) {
            Some(client) => {
                tracing::info!("Media uploads enabled");
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("Media host credentials missing; uploads disabled");
                None
            }
        };

    let settings = Arc::new(settings);
    let app = api::create_app(AppState::new(store, media, settings.clone()));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
