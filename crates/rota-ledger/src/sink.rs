use std::sync::Mutex;

use rota_types::{AccountRecord, LedgerEntry, ReservationRecord};

/// Write-only collaborator told about every successful creation.
/// Implementations must not block and never report failure back.
pub trait LedgerSink {
    fn record(&self, entry: LedgerEntry);

    fn record_account(&self, record: AccountRecord) {
        self.record(LedgerEntry::Account(record));
    }

    fn record_reservation(&self, record: ReservationRecord) {
        self.record(LedgerEntry::Reservation(record));
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl LedgerSink for MemorySink {
    fn record(&self, entry: LedgerEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
