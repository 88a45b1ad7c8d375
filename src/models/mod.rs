pub mod booking;
pub mod response;
pub mod service;
pub mod vehicle;

pub use booking::{BookingDraft, ServiceRequest, ServiceRequestPayload, ServiceRequestStatus};
pub use response::ApiResponse;
pub use service::{Service, ServiceListing, ServiceSource};
pub use vehicle::Vehicle;
