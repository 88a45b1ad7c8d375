use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ApiResponse::<()>::error(self.to_string());
        (status, axum::Json(body)).into_response()
    }
}

/// Errors surfaced by the booking form. The `Display` text is what the form
/// shows to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("Please select a service")]
    MissingService,

    #[error("Please select a preferred date")]
    MissingDate,

    #[error("Please select a valid date")]
    InvalidDate,

    #[error("Preferred date cannot be in the past")]
    DateInPast,

    #[error("Please add vehicle details first")]
    MissingVehicle,

    #[error("Please log in to continue")]
    NotAuthenticated,

    #[error("A booking request is already being submitted")]
    SubmissionInProgress,

    #[error("This booking has already been submitted")]
    AlreadySubmitted,

    #[error("{0}")]
    Rejected(String),

    #[error("Failed to book service. Please try again.")]
    Transport,
}

impl BookingError {
    /// Errors caught before any request is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::MissingService
                | BookingError::MissingDate
                | BookingError::InvalidDate
                | BookingError::DateInPast
                | BookingError::MissingVehicle
                | BookingError::NotAuthenticated
        )
    }
}
