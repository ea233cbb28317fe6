use fastrace::trace;
use rota_types::{Credentials, CustomerId, Profile, FIRST_ID};
use tracing::{debug, info};

use crate::{Administrator, Customer, Person, RegistryError};

/// Every known person, in registration order.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    people: Vec<Person>,
    /// `None` once every id has been handed out.
    next_customer_id: Option<CustomerId>,
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self {
            people: Vec::new(),
            next_customer_id: Some(CustomerId(FIRST_ID)),
        }
    }

    pub fn with_administrators(admins: impl IntoIterator<Item = Administrator>) -> Self {
        let mut registry = Self::new();
        for admin in admins {
            registry.add_administrator(admin);
        }
        registry
    }

    /// First person whose email and password both match, or `None`.
    #[trace]
    pub fn authenticate(&self, credentials: &Credentials) -> Option<&Person> {
        let found = self
            .people
            .iter()
            .find(|person| credentials.matches(person.profile()));
        debug!("Authentication for {:?}: {}", credentials.email, found.is_some());
        found
    }

    /// Hands out ids in strictly increasing order and never repeats one.
    pub fn next_customer_id(&mut self) -> Result<CustomerId, RegistryError> {
        let id = self
            .next_customer_id
            .ok_or(RegistryError::CustomerIdsExhausted)?;
        self.next_customer_id = id.next();
        Ok(id)
    }

    /// Duplicate emails are accepted; `authenticate` returns the earliest match.
    pub fn add_customer(&mut self, customer: Customer) {
        // Keep the counter ahead of ids minted elsewhere.
        if self
            .next_customer_id
            .is_some_and(|next| customer.id() >= next)
        {
            self.next_customer_id = customer.id().next();
        }
        info!("Registered customer {} ({})", customer.id(), customer.name());
        self.people.push(Person::Customer(customer));
    }

    pub fn register_customer(&mut self, profile: Profile) -> Result<CustomerId, RegistryError> {
        let id = self.next_customer_id()?;
        self.add_customer(Customer::new(id, profile));
        Ok(id)
    }

    pub fn add_administrator(&mut self, admin: Administrator) {
        info!("Registered administrator {}", admin.name());
        self.people.push(Person::Administrator(admin));
    }

    pub fn find_customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers().find(|c| c.id() == id)
    }

    pub fn find_customer_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.people
            .iter_mut()
            .filter_map(Person::as_customer_mut)
            .find(|c| c.id() == id)
    }

    /// Removes the customer and, with it, every reservation it owns.
    #[trace]
    pub fn remove_customer(&mut self, id: CustomerId) -> Option<Customer> {
        let index = self
            .people
            .iter()
            .position(|p| p.as_customer().is_some_and(|c| c.id() == id))?;
        match self.people.remove(index) {
            Person::Customer(customer) => {
                info!(
                    "Removed customer {} with {} reservation(s)",
                    id,
                    customer.reservations().len()
                );
                Some(customer)
            }
            Person::Administrator(_) => None,
        }
    }

    pub fn update_customer_profile(
        &mut self,
        id: CustomerId,
        profile: Profile,
    ) -> Option<&Customer> {
        let customer = self.find_customer_mut(id)?;
        customer.profile = profile;
        Some(customer)
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.people.iter().filter_map(Person::as_customer)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use proptest::prelude::*;
    use rota_types::{ReservationId, TripDetails};

    fn profile(name: &str, email: &str, password: &str) -> Profile {
        Profile::new(name, format!("{}-id", name), email, password)
    }

    fn registry() -> IdentityRegistry {
        IdentityRegistry::with_administrators([Administrator::new(profile(
            "Root",
            "admin@rota.local",
            "admin",
        ))])
    }

    #[test]
    fn test_customer_ids_are_strictly_increasing() {
        let mut registry = registry();
        let ana = registry
            .register_customer(profile("Ana", "ana@mail.com", "a"))
            .unwrap();
        let bruno = registry
            .register_customer(profile("Bruno", "bruno@mail.com", "b"))
            .unwrap();
        assert_eq!(ana, CustomerId(1));
        assert_eq!(bruno, CustomerId(2));

        registry.remove_customer(bruno).unwrap();
        let carla = registry
            .register_customer(profile("Carla", "carla@mail.com", "c"))
            .unwrap();
        assert_eq!(carla, CustomerId(3));

        let manual = registry.next_customer_id().unwrap();
        assert_eq!(manual, CustomerId(4));
        registry.add_customer(Customer::new(manual, profile("Davi", "davi@mail.com", "d")));
        assert_eq!(registry.next_customer_id(), Ok(CustomerId(5)));
    }

    #[test]
    fn test_add_customer_keeps_counter_ahead() {
        let mut registry = registry();
        registry.add_customer(Customer::new(CustomerId(10), profile("Eva", "eva@mail.com", "e")));
        assert_eq!(registry.next_customer_id(), Ok(CustomerId(11)));
    }

    #[test]
    fn test_counter_stops_at_last_id() {
        let mut registry = registry();
        registry.add_customer(Customer::new(
            CustomerId(u64::MAX),
            profile("Eva", "eva@mail.com", "e"),
        ));
        assert_eq!(
            registry.next_customer_id(),
            Err(RegistryError::CustomerIdsExhausted)
        );
        assert_eq!(
            registry.register_customer(profile("Fabio", "fabio@mail.com", "f")),
            Err(RegistryError::CustomerIdsExhausted)
        );
        assert_eq!(registry.customers().count(), 1);

        // A lower id added afterwards does not revive the counter.
        let gil = profile("Gil", "gil@mail.com", "g");
        registry.add_customer(Customer::new(CustomerId(3), gil));
        assert!(registry.next_customer_id().is_err());
    }

    #[test]
    fn test_find_customer() {
        let mut registry = registry();
        assert!(registry.find_customer(CustomerId(1)).is_none());

        let ana = registry
            .register_customer(profile("Ana", "ana@mail.com", "a"))
            .unwrap();
        let bruno = registry
            .register_customer(profile("Bruno", "bruno@mail.com", "b"))
            .unwrap();
        assert_eq!(registry.find_customer(ana).unwrap().name(), "Ana");
        assert_eq!(registry.find_customer(bruno).unwrap().name(), "Bruno");
        assert!(registry.find_customer(CustomerId(99)).is_none());
    }

    #[test]
    fn test_authenticate() {
        let mut registry = registry();
        registry
            .register_customer(profile("Ana", "ana@mail.com", "a"))
            .unwrap();

        let admin = registry
            .authenticate(&Credentials::new("admin@rota.local", "admin"))
            .unwrap();
        assert_eq!(admin.role(), Role::Administrator);

        let ana = registry
            .authenticate(&Credentials::new("ana@mail.com", "a"))
            .unwrap();
        assert_eq!(ana.role(), Role::Customer);
        assert_eq!(ana.as_customer().unwrap().id(), CustomerId(1));

        assert!(registry
            .authenticate(&Credentials::new("ana@mail.com", "wrong"))
            .is_none());
        assert!(registry
            .authenticate(&Credentials::new("nobody@mail.com", "a"))
            .is_none());
    }

    #[test]
    fn test_duplicate_email_returns_first_match() {
        let mut registry = registry();
        let first = registry
            .register_customer(profile("Ana", "same@mail.com", "pw"))
            .unwrap();
        registry
            .register_customer(profile("Ana Clone", "same@mail.com", "pw"))
            .unwrap();
        assert_eq!(registry.customers().count(), 2);

        let found = registry
            .authenticate(&Credentials::new("same@mail.com", "pw"))
            .and_then(Person::as_customer)
            .unwrap();
        assert_eq!(found.id(), first);
    }

    #[test]
    fn test_remove_customer_cascades_reservations() {
        let mut registry = registry();
        let ana = registry
            .register_customer(profile("Ana", "ana@mail.com", "a"))
            .unwrap();
        let customer = registry.find_customer_mut(ana).unwrap();
        let trip = customer
            .add_reservation(TripDetails::new("SP", "RJ", "01/01/2025"))
            .unwrap();

        let removed = registry.remove_customer(ana).unwrap();
        assert_eq!(removed.reservations().len(), 1);
        assert!(registry.find_customer(ana).is_none());
        assert!(registry
            .find_customer(ana)
            .and_then(|c| c.find_reservation(trip))
            .is_none());
        assert!(registry
            .authenticate(&Credentials::new("ana@mail.com", "a"))
            .is_none());
    }

    #[test]
    fn test_remove_unknown_customer_is_silent() {
        let mut registry = registry();
        assert!(registry.remove_customer(CustomerId(42)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_customer_profile() {
        let mut registry = registry();
        let ana = registry
            .register_customer(profile("Ana", "ana@mail.com", "a"))
            .unwrap();
        registry
            .find_customer_mut(ana)
            .unwrap()
            .add_reservation(TripDetails::new("SP", "RJ", "01/01/2025"))
            .unwrap();

        let updated = registry
            .update_customer_profile(ana, profile("Ana Maria", "anamaria@mail.com", "new"))
            .unwrap();
        assert_eq!(updated.name(), "Ana Maria");
        assert!(updated.find_reservation(ReservationId(1)).is_some());

        assert!(registry
            .authenticate(&Credentials::new("ana@mail.com", "a"))
            .is_none());
        assert!(registry
            .authenticate(&Credentials::new("anamaria@mail.com", "new"))
            .is_some());
        assert!(registry
            .update_customer_profile(CustomerId(9), profile("X", "x", "x"))
            .is_none());
    }

    #[derive(Debug, Clone)]
    enum Step {
        Register,
        Remove(usize),
        AddWithId(u64),
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Register),
            any::<usize>().prop_map(Step::Remove),
            (1u64..64).prop_map(Step::AddWithId),
        ]
    }

    proptest! {
        #[test]
        fn minted_ids_increase_and_are_never_reused(
            steps in prop::collection::vec(arb_step(), 0..40)
        ) {
            let mut registry = registry();
            let mut seen: Vec<CustomerId> = Vec::new();
            let mut minted: Vec<CustomerId> = Vec::new();

            for step in steps {
                match step {
                    Step::Register => {
                        let id = registry
                            .register_customer(profile("Ana", "ana@mail.com", "a"))
                            .unwrap();
                        prop_assert!(!seen.contains(&id));
                        seen.push(id);
                        minted.push(id);
                    }
                    Step::Remove(pick) => {
                        let ids: Vec<CustomerId> =
                            registry.customers().map(Customer::id).collect();
                        if !ids.is_empty() {
                            let id = ids[pick % ids.len()];
                            prop_assert!(registry.remove_customer(id).is_some());
                            prop_assert!(registry.find_customer(id).is_none());
                        }
                    }
                    Step::AddWithId(raw) => {
                        let id = CustomerId(raw);
                        if !seen.contains(&id) {
                            let bia = profile("Bia", "bia@mail.com", "b");
                            registry.add_customer(Customer::new(id, bia));
                            seen.push(id);
                        }
                    }
                }
            }

            prop_assert!(minted.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
