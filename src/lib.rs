pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod models;
pub mod request;
pub mod validate;

use std::sync::Arc;

use axum::{routing::any, Router};

use extract::Extractor;

/// Builds the gateway router around an explicitly supplied engine.
pub fn router<E: Extractor>(engine: Arc<E>) -> Router {
    Router::new()
        .route("/", any(handler::extract_endpoint::<E>))
        .with_state(engine)
}
