use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::client::SearchClient;

pub mod handlers;
pub mod models;
pub mod templates;

pub struct AppState {
    pub client: SearchClient,
    pub thumb_concurrency: usize,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::search_page_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .nest_service("/static", ServeDir::new("static"))
        .layer(cors)
}
