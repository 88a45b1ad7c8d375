use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Local, NaiveDate, Utc};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::authenticate;
use crate::models::booking::DATE_FORMAT;
use crate::models::{ApiResponse, ServiceRequest, ServiceRequestPayload, ServiceRequestStatus};
use crate::state::AppState;

// POST /api/service-requests
pub async fn create_service_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ServiceRequestPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceRequest>>), AppError> {
    let db = state.db.lock().unwrap();
    let customer_id = authenticate(&db, &headers)?;

    let Json(payload) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let scheduled_date = NaiveDate::parse_from_str(payload.scheduled_date.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation("scheduled_date must be YYYY-MM-DD".to_string()))?;
    if scheduled_date < Local::now().date_naive() {
        return Err(AppError::Validation(
            "Preferred date cannot be in the past".to_string(),
        ));
    }
    if payload.estimated_cost < 0 {
        return Err(AppError::Validation(
            "estimated_cost cannot be negative".to_string(),
        ));
    }

    if queries::get_customer_vehicle(&db, &customer_id, payload.vehicle_id)?.is_none() {
        return Err(AppError::Validation("Vehicle not found".to_string()));
    }
    if queries::get_service(&db, payload.service_id)?.is_none() {
        return Err(AppError::Validation("Service not available".to_string()));
    }

    let request = ServiceRequest {
        request_id: uuid::Uuid::new_v4().to_string(),
        customer_id,
        vehicle_id: payload.vehicle_id,
        service_id: payload.service_id,
        scheduled_date,
        customer_notes: payload.customer_notes.trim().to_string(),
        estimated_cost: payload.estimated_cost,
        status: ServiceRequestStatus::Pending,
        created_at: Utc::now().naive_utc(),
    };
    queries::create_service_request(&db, &request)?;

    tracing::info!(
        request_id = %request.request_id,
        customer_id = %request.customer_id,
        service_id = request.service_id,
        scheduled_date = %request.scheduled_date,
        "service request created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            request,
            "Service request created successfully",
        )),
    ))
}

// GET /api/service-requests
pub async fn list_service_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<ServiceRequest>>>, AppError> {
    let requests = {
        let db = state.db.lock().unwrap();
        let customer_id = authenticate(&db, &headers)?;
        queries::list_service_requests(&db, &customer_id)?
    };

    Ok(Json(ApiResponse::ok(requests)))
}
