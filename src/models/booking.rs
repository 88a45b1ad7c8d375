use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Service;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// In-memory booking state for one visit to the booking screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub service: Option<Service>,
    pub scheduled_date: String,
    pub customer_notes: String,
    pub estimated_cost: i64,
}

impl BookingDraft {
    pub fn select(&mut self, service: Service) {
        self.estimated_cost = service.base_price;
        self.service = Some(service);
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.scheduled_date.trim(), DATE_FORMAT).ok()
    }
}

/// Body of `POST /api/service-requests`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequestPayload {
    pub vehicle_id: i64,
    pub service_id: i64,
    pub scheduled_date: String,
    #[serde(default)]
    pub customer_notes: String,
    pub estimated_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequest {
    pub request_id: String,
    pub customer_id: String,
    pub vehicle_id: i64,
    pub service_id: i64,
    pub scheduled_date: NaiveDate,
    pub customer_notes: String,
    pub estimated_cost: i64,
    pub status: ServiceRequestStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRequestStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRequestStatus::Pending => "pending",
            ServiceRequestStatus::Confirmed => "confirmed",
            ServiceRequestStatus::InProgress => "in_progress",
            ServiceRequestStatus::Completed => "completed",
            ServiceRequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => ServiceRequestStatus::Confirmed,
            "in_progress" => ServiceRequestStatus::InProgress,
            "completed" => ServiceRequestStatus::Completed,
            "cancelled" => ServiceRequestStatus::Cancelled,
            _ => ServiceRequestStatus::Pending,
        }
    }
}
