use serde::Deserialize;

use crate::models::{Service, ServiceListing, ServiceSource, Vehicle};
use crate::services::api::ServiceApi;
use crate::services::credentials::CredentialProvider;
use crate::services::navigation::Route;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load services";

/// What the previous screen handed to the booking screen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavigationContext {
    pub vehicle: Option<Vehicle>,
    pub selected_service: Option<ServiceListing>,
    pub from_services: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The service was picked while browsing, before any vehicle was known.
    CatalogFirst,
    VehicleFirst,
}

/// Everything the booking form needs once the entry checks have passed.
#[derive(Debug, Clone)]
pub struct BookingSession {
    pub origin: Origin,
    pub vehicle: Option<Vehicle>,
    pub services: Vec<Service>,
    pub preselected: Option<Service>,
    pub load_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Ready(BookingSession),
    Redirect(Route),
}

pub async fn load_catalog(
    ctx: NavigationContext,
    api: &dyn ServiceApi,
    credentials: &dyn CredentialProvider,
) -> LoadOutcome {
    if credentials.credential().is_none() {
        tracing::info!("no session credential, redirecting to login");
        return LoadOutcome::Redirect(Route::Login);
    }

    match ctx {
        NavigationContext {
            selected_service: Some(listing),
            from_services: true,
            vehicle,
        } => {
            let service = ServiceSource::Listing(listing).resolve();
            tracing::debug!(
                service_id = service.service_id,
                base_price = service.base_price,
                estimated_time = service.estimated_time,
                "using pre-selected service"
            );
            LoadOutcome::Ready(BookingSession {
                origin: Origin::CatalogFirst,
                vehicle,
                services: vec![service.clone()],
                preselected: Some(service),
                load_error: None,
            })
        }
        NavigationContext {
            vehicle: Some(vehicle),
            ..
        } => {
            let (services, load_error) = fetch_services(api).await;
            LoadOutcome::Ready(BookingSession {
                origin: Origin::VehicleFirst,
                vehicle: Some(vehicle),
                services,
                preselected: None,
                load_error,
            })
        }
        _ => {
            tracing::warn!("booking screen opened without vehicle or service, redirecting home");
            LoadOutcome::Redirect(Route::Home)
        }
    }
}

async fn fetch_services(api: &dyn ServiceApi) -> (Vec<Service>, Option<String>) {
    match api.list_services().await {
        Ok(resp) if resp.success => {
            let services = resp.data.unwrap_or_default();
            tracing::info!(count = services.len(), "loaded service catalog");
            (services, None)
        }
        Ok(resp) => {
            tracing::warn!(message = ?resp.message, "service catalog request unsuccessful");
            (Vec::new(), Some(LOAD_FAILED_MESSAGE.to_string()))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load service catalog");
            (Vec::new(), Some(LOAD_FAILED_MESSAGE.to_string()))
        }
    }
}
