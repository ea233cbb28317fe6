use serde::{Deserialize, Serialize};

use crate::{CustomerId, Profile, ReservationId, TripDetails};

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub customer_id: CustomerId,
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub password: String,
}

impl AccountRecord {
    pub fn new(customer_id: CustomerId, profile: &Profile) -> Self {
        Self {
            customer_id,
            name: profile.name.clone(),
            national_id: profile.national_id.clone(),
            email: profile.email.clone(),
            password: profile.password.clone(),
        }
    }
}

// ============================================================================
// Reservations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub customer_id: CustomerId,
    pub reservation_id: ReservationId,
    pub origin: String,
    pub destination: String,
    pub travel_date: String,
}

impl ReservationRecord {
    pub fn new(customer_id: CustomerId, reservation_id: ReservationId, trip: &TripDetails) -> Self {
        Self {
            customer_id,
            reservation_id,
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            travel_date: trip.travel_date.clone(),
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEntry {
    Account(AccountRecord),
    Reservation(ReservationRecord),
}

impl LedgerEntry {
    pub fn customer_id(&self) -> CustomerId {
        match self {
            LedgerEntry::Account(record) => record.customer_id,
            LedgerEntry::Reservation(record) => record.customer_id,
        }
    }
}
