pub mod http;

use async_trait::async_trait;

use crate::models::{ApiResponse, Service, ServiceRequest, ServiceRequestPayload};

/// Backend calls the booking workflow depends on.
///
/// An `Err` means the request never produced a readable response (connection
/// refused, timeout, malformed body). A response with `success: false` is
/// returned as `Ok`.
#[async_trait]
pub trait ServiceApi: Send + Sync {
    async fn list_services(&self) -> anyhow::Result<ApiResponse<Vec<Service>>>;

    async fn create_service_request(
        &self,
        payload: &ServiceRequestPayload,
        credential: &str,
    ) -> anyhow::Result<ApiResponse<ServiceRequest>>;
}
