use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fallback used when a listing's duration text can't be read.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:-\s*(\d+))?\s*(mins?|hours?)").expect("valid duration pattern")
});

/// A bookable service as returned by `GET /api/services`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    pub description: String,
    pub base_price: i64,
    pub estimated_time: i64,
    pub category: String,
}

/// A service as shown on the catalog-browsing screen, e.g. price `"₹1,200-1,500"`
/// and duration `"30-45 mins"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceListing {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub duration: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceSource {
    Catalog(Service),
    Listing(ServiceListing),
}

impl ServiceSource {
    pub fn resolve(self) -> Service {
        match self {
            ServiceSource::Catalog(service) => service,
            ServiceSource::Listing(listing) => Service {
                service_id: listing.id,
                base_price: parse_price(&listing.price),
                estimated_time: parse_duration(&listing.duration),
                name: listing.name,
                description: listing.description,
                category: listing.category,
            },
        }
    }
}

impl From<ServiceListing> for Service {
    fn from(listing: ServiceListing) -> Self {
        ServiceSource::Listing(listing).resolve()
    }
}

/// Leading whole-rupee amount of a display price. Ranges keep their lower
/// bound; anything unreadable is 0.
pub fn parse_price(display: &str) -> i64 {
    let cleaned: String = display
        .chars()
        .filter(|c| *c != '₹' && *c != ',')
        .collect();
    let lower = cleaned.split('-').next().unwrap_or("").trim();
    let digits: String = lower.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Minutes for a display duration such as `"45 mins"` or `"1-2 hours"`.
/// Ranges use their first number.
pub fn parse_duration(display: &str) -> i64 {
    let Some(caps) = DURATION_RE.captures(display) else {
        return DEFAULT_DURATION_MINUTES;
    };

    let Ok(first) = caps[1].parse::<i64>() else {
        return DEFAULT_DURATION_MINUTES;
    };

    if caps[3].to_lowercase().starts_with("hour") {
        first.checked_mul(60).unwrap_or(DEFAULT_DURATION_MINUTES)
    } else {
        first
    }
}
