pub mod config;
pub mod error;
pub mod models;
pub mod text;
pub mod normalize;
pub mod filter;
pub mod stats;
pub mod session;
pub mod backend_client;
pub mod middleware;
pub mod controllers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub backend: backend_client::BackendClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, error::BackendError> {
        let backend = backend_client::BackendClient::from_config(&config.backend)?;
        Ok(Arc::new(Self { config, backend }))
    }
}

/// Full HTTP application: health routes plus the `/api` listing routes.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "AfricaEvents API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes(&state))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
