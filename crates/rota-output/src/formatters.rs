use rota_registry::{Customer, Reservation};
use rota_types::LedgerEntry;

pub fn format_reservation(reservation: &Reservation) -> String {
    format!(
        "#{}  {} -> {}  on {}",
        reservation.id(),
        reservation.origin(),
        reservation.destination(),
        reservation.travel_date()
    )
}

pub fn format_reservations(reservations: &[Reservation]) -> String {
    if reservations.is_empty() {
        return "No reservations.".to_string();
    }
    reservations
        .iter()
        .map(format_reservation)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_customer(customer: &Customer) -> String {
    let count = customer.reservations().len();
    format!(
        "{}  {} <{}>  national id {}  ({} reservation{})",
        customer.id(),
        customer.name(),
        customer.profile.email,
        customer.profile.national_id,
        count,
        if count == 1 { "" } else { "s" }
    )
}

/// Passwords are recorded on the ledger but never printed.
pub fn format_ledger_entry(entry: &LedgerEntry) -> String {
    match entry {
        LedgerEntry::Account(record) => format!(
            "account      customer {}  {} <{}>  national id {}",
            record.customer_id, record.name, record.email, record.national_id
        ),
        LedgerEntry::Reservation(record) => format!(
            "reservation  customer {} #{}  {} -> {}  on {}",
            record.customer_id,
            record.reservation_id,
            record.origin,
            record.destination,
            record.travel_date
        ),
    }
}

pub fn format_ledger_entries(entries: &[LedgerEntry]) -> String {
    if entries.is_empty() {
        return "Ledger is empty.".to_string();
    }
    entries
        .iter()
        .map(format_ledger_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_types::{AccountRecord, CustomerId, Profile, TripDetails};

    fn ana() -> Customer {
        Customer::new(CustomerId(1), Profile::new("Ana", "123", "ana@mail.com", "pw"))
    }

    #[test]
    fn test_format_reservations() {
        let mut customer = ana();
        assert_eq!(format_reservations(customer.reservations()), "No reservations.");

        customer
            .add_reservation(TripDetails::new("SP", "RJ", "01/01/2025"))
            .unwrap();
        customer
            .add_reservation(TripDetails::new("RJ", "BH", "02/02/2025"))
            .unwrap();
        assert_eq!(
            format_reservations(customer.reservations()),
            "#1  SP -> RJ  on 01/01/2025\n#2  RJ -> BH  on 02/02/2025"
        );
    }

    #[test]
    fn test_format_customer() {
        let customer = ana();
        assert_eq!(
            format_customer(&customer),
            "1  Ana <ana@mail.com>  national id 123  (0 reservations)"
        );
    }

    #[test]
    fn test_ledger_hides_passwords() {
        let entry = LedgerEntry::Account(AccountRecord::new(
            CustomerId(1),
            &Profile::new("Ana", "123", "ana@mail.com", "hunter2"),
        ));
        let text = format_ledger_entries(&[entry]);
        assert!(text.contains("Ana <ana@mail.com>"));
        assert!(!text.contains("hunter2"));
    }
}
