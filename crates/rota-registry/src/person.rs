use rota_types::{CustomerId, Profile, ReservationId, FIRST_ID};

use crate::Reservation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Administrator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Person {
    Customer(Customer),
    Administrator(Administrator),
}

impl Person {
    pub fn profile(&self) -> &Profile {
        match self {
            Person::Customer(customer) => &customer.profile,
            Person::Administrator(admin) => &admin.profile,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Person::Customer(_) => Role::Customer,
            Person::Administrator(_) => Role::Administrator,
        }
    }

    pub fn as_customer(&self) -> Option<&Customer> {
        match self {
            Person::Customer(customer) => Some(customer),
            Person::Administrator(_) => None,
        }
    }

    pub fn as_customer_mut(&mut self) -> Option<&mut Customer> {
        match self {
            Person::Customer(customer) => Some(customer),
            Person::Administrator(_) => None,
        }
    }
}

/// A person who owns reservations. Dropping a customer drops everything it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub(crate) id: CustomerId,
    pub profile: Profile,
    pub(crate) reservations: Vec<Reservation>,
    pub(crate) next_reservation_id: Option<ReservationId>,
}

impl Customer {
    pub fn new(id: CustomerId, profile: Profile) -> Self {
        Self {
            id,
            profile,
            reservations: Vec::new(),
            next_reservation_id: Some(ReservationId(FIRST_ID)),
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Administrator {
    pub profile: Profile,
}

impl Administrator {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

impl From<Customer> for Person {
    fn from(customer: Customer) -> Self {
        Person::Customer(customer)
    }
}

impl From<Administrator> for Person {
    fn from(admin: Administrator) -> Self {
        Person::Administrator(admin)
    }
}
