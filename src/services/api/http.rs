use anyhow::Context;
use async_trait::async_trait;

use super::ServiceApi;
use crate::models::{ApiResponse, Service, ServiceRequest, ServiceRequestPayload};

pub struct HttpServiceApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpServiceApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ServiceApi for HttpServiceApi {
    async fn list_services(&self) -> anyhow::Result<ApiResponse<Vec<Service>>> {
        let resp = self
            .client
            .get(format!("{}/api/services", self.base_url))
            .send()
            .await
            .context("failed to fetch services")?;

        let status = resp.status();
        let body: ApiResponse<Vec<Service>> = resp
            .json()
            .await
            .with_context(|| format!("failed to parse services response ({status})"))?;

        Ok(body)
    }

    async fn create_service_request(
        &self,
        payload: &ServiceRequestPayload,
        credential: &str,
    ) -> anyhow::Result<ApiResponse<ServiceRequest>> {
        let resp = self
            .client
            .post(format!("{}/api/service-requests", self.base_url))
            .bearer_auth(credential)
            .json(payload)
            .send()
            .await
            .context("failed to submit service request")?;

        let status = resp.status();
        let body: ApiResponse<ServiceRequest> = resp
            .json()
            .await
            .with_context(|| format!("failed to parse service request response ({status})"))?;

        if !status.is_success() {
            tracing::warn!(%status, message = ?body.message, "service request rejected");
        }

        Ok(body)
    }
}
