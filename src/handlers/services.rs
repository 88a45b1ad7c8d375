use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ApiResponse, Service};
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Service>>>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        queries::list_active_services(&db)?
    };

    Ok(Json(ApiResponse::ok(services)))
}

// GET /api/services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<i64>,
) -> Result<Json<ApiResponse<Service>>, AppError> {
    let service = {
        let db = state.db.lock().unwrap();
        queries::get_service(&db, service_id)?
    };

    service
        .map(|s| Json(ApiResponse::ok(s)))
        .ok_or_else(|| AppError::NotFound(format!("service {service_id}")))
}
