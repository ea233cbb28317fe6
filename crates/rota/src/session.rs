use std::io::{BufRead, Write};

use rota_ledger::LedgerSink;
use rota_output::{format_customer, format_reservations};
use rota_registry::{Customer, IdentityRegistry, Person};
use rota_types::{
    same_place, AccountRecord, Credentials, CustomerId, Profile, ReservationId, ReservationRecord,
    TripDetails,
};
use tracing::{info, warn};

use crate::console::{Console, ConsoleError};

const INVALID_OPTION: &str = "Invalid option. Try again.";
const LOGIN_FAILED: &str = "Incorrect email or password. Try again.";
const SAME_PLACE: &str = "Destination cannot be the same as origin, try again.";
const RESERVATION_NOT_FOUND: &str = "Reservation not found.";
const CUSTOMER_NOT_FOUND: &str = "Customer not found.";
const CHOOSE: &str = "Choose an option: ";
const DATE_PROMPT: &str = "Travel date (DD/MM/YYYY): ";

/// Who is logged in. Holds ids rather than borrows so the registry stays free
/// to change under each handler.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Actor {
    Customer(CustomerId),
    Administrator(String),
}

enum Flow {
    Stay,
    Logout,
}

pub struct Session<S, R, W> {
    registry: IdentityRegistry,
    sink: S,
    console: Console<R, W>,
}

impl<S, R, W> Session<S, R, W>
where
    S: LedgerSink,
    R: BufRead,
    W: Write,
{
    pub fn new(registry: IdentityRegistry, sink: S, console: Console<R, W>) -> Self {
        Self {
            registry,
            sink,
            console,
        }
    }

    pub fn into_parts(self) -> (IdentityRegistry, S, Console<R, W>) {
        (self.registry, self.sink, self.console)
    }

    /// Runs until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), ConsoleError> {
        match self.main_menu() {
            Err(ConsoleError::Closed) => {
                info!("Input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> Result<(), ConsoleError> {
        loop {
            self.console.println("=== Reservation System ===")?;
            self.console.println("1. Log in")?;
            self.console.println("2. Create account")?;
            self.console.println("3. Exit")?;
            self.console.prompt(CHOOSE)?;

            match self.console.read_choice()? {
                '1' => self.login()?,
                '2' => self.create_account()?,
                '3' => return Ok(()),
                _ => self.console.println(INVALID_OPTION)?,
            }
        }
    }

    fn login(&mut self) -> Result<(), ConsoleError> {
        self.console.println("=== Log In ===")?;
        let email = self.console.ask("Email: ")?;
        let password = self.console.ask("Password: ")?;

        let actor = match self.registry.authenticate(&Credentials::new(email, password)) {
            Some(Person::Customer(customer)) => Actor::Customer(customer.id()),
            Some(Person::Administrator(admin)) => Actor::Administrator(admin.name().to_string()),
            None => {
                warn!("Failed login attempt");
                return self.console.println(LOGIN_FAILED);
            }
        };

        self.console.println("Login successful!")?;
        match actor {
            Actor::Customer(id) => {
                info!("Customer {} logged in", id);
                self.customer_menu(id)
            }
            Actor::Administrator(name) => {
                info!("Administrator {} logged in", name);
                self.administrator_menu()
            }
        }
    }

    fn create_account(&mut self) -> Result<(), ConsoleError> {
        self.console.println("=== Create Account ===")?;
        let name = self.console.ask("Name: ")?;
        let national_id = self.console.ask("National ID: ")?;
        let email = self.console.ask("Email: ")?;
        let password = self.console.ask("Password: ")?;
        let profile = Profile::new(name, national_id, email, password);

        let id = match self.registry.next_customer_id() {
            Ok(id) => id,
            Err(e) => {
                warn!("Account not created: {}", e);
                return self.console.println(format!("Account not created: {}", e));
            }
        };
        self.sink.record_account(AccountRecord::new(id, &profile));
        self.registry.add_customer(Customer::new(id, profile));

        self.console.println("Account created successfully!")?;
        self.console.println(format!("Your ID is: {}", id))
    }

    // ========================================================================
    // Customer
    // ========================================================================

    fn customer_menu(&mut self, id: CustomerId) -> Result<(), ConsoleError> {
        loop {
            if self.registry.find_customer(id).is_none() {
                return self.console.println(CUSTOMER_NOT_FOUND);
            }

            self.console.println("")?;
            self.console.println("=== Main Menu ===")?;
            self.console.println("1. New reservation")?;
            self.console.println("2. View reservations")?;
            self.console.println("3. Edit reservation")?;
            self.console.println("4. Delete reservation")?;
            self.console.println("5. Delete account")?;
            self.console.println("6. Log out")?;
            self.console.prompt(CHOOSE)?;

            let flow = match self.console.read_choice()? {
                '1' => self.create_reservations(id)?,
                '2' => self.view_reservations(id)?,
                '3' => self.edit_reservation(id)?,
                '4' => self.delete_reservation(id)?,
                '5' => {
                    self.delete_own_account(id)?;
                    Flow::Logout
                }
                '6' => Flow::Logout,
                _ => {
                    self.console.println(INVALID_OPTION)?;
                    Flow::Stay
                }
            };

            if let Flow::Logout = flow {
                info!("Customer {} logged out", id);
                return Ok(());
            }
        }
    }

    fn create_reservations(&mut self, id: CustomerId) -> Result<Flow, ConsoleError> {
        loop {
            self.console.println("=== New Reservation ===")?;
            let origin = self.console.ask("Origin: ")?;
            let destination = self.console.ask("Destination: ")?;

            if same_place(&origin, &destination) {
                self.console.println(SAME_PLACE)?;
            } else {
                let travel_date = self.console.ask(DATE_PROMPT)?;
                self.add_reservation(id, TripDetails::new(origin, destination, travel_date))?;
            }

            let again = self.console.ask("Make another reservation? (Y/N): ")?;
            if again.trim().eq_ignore_ascii_case("n") {
                return Ok(Flow::Stay);
            }
        }
    }

    fn add_reservation(&mut self, id: CustomerId, trip: TripDetails) -> Result<(), ConsoleError> {
        let Some(customer) = self.registry.find_customer_mut(id) else {
            return self.console.println(CUSTOMER_NOT_FOUND);
        };

        match customer.add_reservation(trip.clone()) {
            Ok(reservation_id) => {
                self.sink
                    .record_reservation(ReservationRecord::new(id, reservation_id, &trip));
                self.console
                    .println(format!("Reservation #{} created successfully!", reservation_id))
            }
            Err(e) => self.console.println(format!("Reservation rejected: {}", e)),
        }
    }

    fn view_reservations(&mut self, id: CustomerId) -> Result<Flow, ConsoleError> {
        let text = match self.registry.find_customer(id) {
            Some(customer) => format_reservations(customer.reservations()),
            None => CUSTOMER_NOT_FOUND.to_string(),
        };
        self.console.println("=== Your Reservations ===")?;
        self.console.println(text)?;
        Ok(Flow::Stay)
    }

    fn edit_reservation(&mut self, id: CustomerId) -> Result<Flow, ConsoleError> {
        self.console.println("=== Edit Reservation ===")?;
        let Some(reservation_id) = self.ask_reservation_id(id)? else {
            self.console.println(RESERVATION_NOT_FOUND)?;
            return Ok(Flow::Stay);
        };

        let origin = self.console.ask("New origin: ")?;
        let destination = self.console.ask("New destination: ")?;
        let travel_date = self.console.ask("New travel date (DD/MM/YYYY): ")?;
        let trip = TripDetails::new(origin, destination, travel_date);

        let edited = self
            .registry
            .find_customer_mut(id)
            .and_then(|customer| customer.edit_reservation(reservation_id, trip))
            .is_some();
        if edited {
            self.console.println("Reservation updated successfully!")?;
        } else {
            self.console.println(RESERVATION_NOT_FOUND)?;
        }
        Ok(Flow::Stay)
    }

    fn delete_reservation(&mut self, id: CustomerId) -> Result<Flow, ConsoleError> {
        self.console.println("=== Delete Reservation ===")?;
        let removed = match self.ask_reservation_id(id)? {
            Some(reservation_id) => self
                .registry
                .find_customer_mut(id)
                .and_then(|customer| customer.remove_reservation(reservation_id)),
            None => None,
        };

        match removed {
            Some(_) => self.console.println("Reservation deleted successfully!")?,
            None => self.console.println(RESERVATION_NOT_FOUND)?,
        }
        Ok(Flow::Stay)
    }

    /// Reads an id and returns it only if the customer owns such a reservation.
    fn ask_reservation_id(
        &mut self,
        id: CustomerId,
    ) -> Result<Option<ReservationId>, ConsoleError> {
        let input = self.console.ask("Reservation ID: ")?;
        let Ok(reservation_id) = input.parse::<ReservationId>() else {
            return Ok(None);
        };
        let exists = self
            .registry
            .find_customer(id)
            .and_then(|customer| customer.find_reservation(reservation_id))
            .is_some();
        Ok(exists.then_some(reservation_id))
    }

    fn delete_own_account(&mut self, id: CustomerId) -> Result<(), ConsoleError> {
        self.console.println("=== Delete Account ===")?;
        let answer = self
            .console
            .ask("Are you sure you want to delete your account? (Y/N): ")?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            return self.console.println("Operation cancelled.");
        }

        self.registry.remove_customer(id);
        self.console.println("Account deleted successfully!")
    }

    // ========================================================================
    // Administrator
    // ========================================================================

    fn administrator_menu(&mut self) -> Result<(), ConsoleError> {
        loop {
            self.console.println("")?;
            self.console.println("=== Administrator Menu ===")?;
            self.console.println("1. Change a customer's personal data by ID")?;
            self.console.println("2. Show a customer's reservations")?;
            self.console.println("3. Delete a customer account")?;
            self.console.println("4. Log out")?;
            self.console.prompt(CHOOSE)?;

            match self.console.read_choice()? {
                '1' => self.change_customer_data()?,
                '2' => self.show_customer_reservations()?,
                '3' => self.delete_customer()?,
                '4' => {
                    info!("Administrator logged out");
                    return Ok(());
                }
                _ => self.console.println(INVALID_OPTION)?,
            }
        }
    }

    fn ask_customer_id(&mut self) -> Result<Option<CustomerId>, ConsoleError> {
        let input = self.console.ask("Customer ID: ")?;
        Ok(input.parse().ok())
    }

    fn change_customer_data(&mut self) -> Result<(), ConsoleError> {
        self.console.println("=== Change Customer Data ===")?;
        let found = self
            .ask_customer_id()?
            .and_then(|id| self.registry.find_customer(id))
            .map(|customer| (customer.id(), customer.name().to_string()));
        let Some((id, name)) = found else {
            return self.console.println(CUSTOMER_NOT_FOUND);
        };

        self.console.println(format!("Changing data for: {}", name))?;
        let name = self.console.ask("New name: ")?;
        let national_id = self.console.ask("New national ID: ")?;
        let email = self.console.ask("New email: ")?;
        let password = self.console.ask("New password: ")?;

        let profile = Profile::new(name, national_id, email, password);
        match self.registry.update_customer_profile(id, profile) {
            Some(_) => self.console.println("Data updated successfully!"),
            None => self.console.println(CUSTOMER_NOT_FOUND),
        }
    }

    fn show_customer_reservations(&mut self) -> Result<(), ConsoleError> {
        let text = match self
            .ask_customer_id()?
            .and_then(|id| self.registry.find_customer(id))
        {
            Some(customer) => format!(
                "{}\n{}",
                format_customer(customer),
                format_reservations(customer.reservations())
            ),
            None => CUSTOMER_NOT_FOUND.to_string(),
        };
        self.console.println(text)
    }

    fn delete_customer(&mut self) -> Result<(), ConsoleError> {
        let removed = self
            .ask_customer_id()?
            .and_then(|id| self.registry.remove_customer(id));
        match removed {
            Some(customer) => self
                .console
                .println(format!("Customer {} deleted.", customer.id())),
            None => self.console.println(CUSTOMER_NOT_FOUND),
        }
    }
}
