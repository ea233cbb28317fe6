use serde::{Deserialize, Serialize};

/// The editable part of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    pub origin: String,
    pub destination: String,
    /// DD/MM/YYYY by convention; never parsed.
    pub travel_date: String,
}

impl TripDetails {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        travel_date: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            travel_date: travel_date.into(),
        }
    }

    pub fn same_endpoints(&self) -> bool {
        same_place(&self.origin, &self.destination)
    }
}

pub fn same_place(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
