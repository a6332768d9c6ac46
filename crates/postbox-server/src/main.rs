use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::IntoResponse;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use postbox_api::contact::{self, AppStateInner, panic_detail};
use postbox_api::error::ApiError;
use postbox_store::SupabaseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postbox=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let supabase_url = std::env::var("SUPABASE_URL").unwrap_or_default();
    let service_key = std::env::var("SUPABASE_SERVICE_KEY").unwrap_or_default();
    if supabase_url.is_empty() || service_key.is_empty() {
        eprintln!("FATAL: SUPABASE_URL and SUPABASE_SERVICE_KEY must be set.");
        eprintln!("       Set them in your .env file and restart.");
        std::process::exit(1);
    }

    let host = std::env::var("POSTBOX_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("POSTBOX_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;

    // One store client for the whole process
    let store = SupabaseStore::new(&supabase_url, &service_key);
    let state = Arc::new(AppStateInner {
        store: Arc::new(store),
    });

    let app = contact::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(
            |panic: Box<dyn std::any::Any + Send + 'static>| {
                // Log the real cause, answer with the opaque 500.
                error!("Handler panicked: {}", panic_detail(panic));
                ApiError::Internal.into_response()
            },
        ));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Postbox server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
