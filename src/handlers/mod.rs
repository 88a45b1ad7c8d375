pub mod auth;
pub mod health;
pub mod service_requests;
pub mod services;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/services", get(services::list_services))
        .route("/api/services/:id", get(services::get_service))
        .route(
            "/api/service-requests",
            get(service_requests::list_service_requests)
                .post(service_requests::create_service_request),
        )
        .with_state(state)
}
