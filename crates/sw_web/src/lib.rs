use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/articles", post(handlers::create_article))
        .route("/api/articles/:topic/download", get(handlers::download_article))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind and serve the app until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> sw_core::Result<()> {
    let app = create_app(state).await;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
