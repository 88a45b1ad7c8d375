use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub fuel_type: String,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.year)
    }
}
