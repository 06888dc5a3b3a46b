//! HTTP surface: routing, CORS, and state shared across requests.

mod handlers;
mod validate;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::scan::ScanRunner;

pub struct AppState {
    pub runner: ScanRunner,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/scan", get(handlers::scan))
        .route("/scan/quick", get(handlers::quick_scan))
        .layer(cors)
        .layer(CompressionLayer::new())
        .with_state(state)
}
