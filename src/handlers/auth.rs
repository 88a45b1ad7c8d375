use axum::http::HeaderMap;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;

/// Resolves the bearer token in `Authorization` to a customer id.
pub fn authenticate(conn: &Connection, headers: &HeaderMap) -> Result<String, AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    queries::get_customer_for_token(conn, token)?.ok_or(AppError::Unauthorized)
}
