use fastrace::trace;
use rota_types::{ReservationId, TripDetails};
use tracing::debug;

use crate::{Customer, RegistryError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    id: ReservationId,
    pub trip: TripDetails,
}

impl Reservation {
    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn origin(&self) -> &str {
        &self.trip.origin
    }

    pub fn destination(&self) -> &str {
        &self.trip.destination
    }

    pub fn travel_date(&self) -> &str {
        &self.trip.travel_date
    }

    /// Overwrites all three fields. Origin and destination are not compared here.
    pub fn edit(&mut self, trip: TripDetails) {
        self.trip = trip;
    }
}

impl Customer {
    #[trace]
    pub fn add_reservation(&mut self, trip: TripDetails) -> Result<ReservationId, RegistryError> {
        if trip.same_endpoints() {
            return Err(RegistryError::SameOriginAndDestination {
                place: trip.origin,
            });
        }

        let id = self
            .next_reservation_id
            .ok_or(RegistryError::ReservationIdsExhausted { customer: self.id })?;
        self.next_reservation_id = id.next();
        self.reservations.push(Reservation { id, trip });
        debug!("Customer {} added reservation {}", self.id, id);
        Ok(id)
    }

    pub fn find_reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    pub fn find_reservation_mut(&mut self, id: ReservationId) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| r.id == id)
    }

    #[trace]
    pub fn edit_reservation(
        &mut self,
        id: ReservationId,
        trip: TripDetails,
    ) -> Option<&Reservation> {
        let reservation = self.find_reservation_mut(id)?;
        reservation.edit(trip);
        Some(reservation)
    }

    #[trace]
    pub fn remove_reservation(&mut self, id: ReservationId) -> Option<Reservation> {
        let index = self.reservations.iter().position(|r| r.id == id)?;
        debug!("Customer {} removed reservation {}", self.id, id);
        Some(self.reservations.remove(index))
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }
}
