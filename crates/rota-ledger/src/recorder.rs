use std::sync::Arc;

use fastrace::prelude::*;
use rota_types::LedgerEntry;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{LedgerSink, LmdbLedger};

const WRITE_BATCH_SIZE: usize = 32;

/// Sending half of the ledger. Cheap to clone, never blocks the caller.
#[derive(Debug, Clone)]
pub struct Recorder {
    tx: Option<mpsc::UnboundedSender<LedgerEntry>>,
}

impl Recorder {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LedgerEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }
}

impl LedgerSink for Recorder {
    fn record(&self, entry: LedgerEntry) {
        let Some(tx) = &self.tx else {
            debug!("Ledger disabled, dropping entry for customer {}", entry.customer_id());
            return;
        };
        if let Err(e) = tx.send(entry) {
            warn!(
                "Ledger writer is gone, dropping entry for customer {}",
                e.0.customer_id()
            );
        }
    }
}

/// Receiving half: drains the channel into LMDB until every `Recorder` is dropped.
pub struct LedgerWriter {
    ledger: LmdbLedger,
    rx: mpsc::UnboundedReceiver<LedgerEntry>,
}

impl LedgerWriter {
    pub fn new(ledger: LmdbLedger) -> (Self, Recorder) {
        let (recorder, rx) = Recorder::channel();
        (Self { ledger, rx }, recorder)
    }

    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }

    /// Returns how many entries reached the ledger. Failed batches are logged
    /// and dropped.
    pub async fn run(self) -> usize {
        let Self { ledger, mut rx } = self;
        let ledger = Arc::new(ledger);
        let mut written = 0;

        while let Some(entry) = rx.recv().await {
            let mut batch = Vec::with_capacity(WRITE_BATCH_SIZE);
            batch.push(entry);
            while batch.len() < WRITE_BATCH_SIZE {
                match rx.try_recv() {
                    Ok(entry) => batch.push(entry),
                    Err(_) => break,
                }
            }

            let count = batch.len();
            let ledger = Arc::clone(&ledger);
            // LMDB commits block on fsync.
            let result = tokio::task::spawn_blocking(move || {
                let root = Span::root("ledger_batch", SpanContext::random());
                let _guard = root.set_local_parent();
                ledger.append_many(&batch)
            })
            .await;

            match result {
                Ok(Ok(n)) => written += n,
                Ok(Err(e)) => warn!("Dropping {} ledger entries: {}", count, e),
                Err(e) => warn!("Ledger write task failed, dropping {} entries: {}", count, e),
            }
        }

        info!("Ledger writer finished, {} entries written", written);
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_types::{
        AccountRecord, CustomerId, Profile, ReservationId, ReservationRecord, TripDetails,
    };

    fn account(id: u64) -> AccountRecord {
        AccountRecord::new(CustomerId(id), &Profile::new("Ana", "1", "ana@mail.com", "pw"))
    }

    #[test]
    fn test_disabled_recorder_drops_entries() {
        let recorder = Recorder::disabled();
        assert!(!recorder.is_enabled());
        recorder.record_account(account(1));
    }

    #[test]
    fn test_closed_channel_is_not_an_error() {
        let (recorder, rx) = Recorder::channel();
        drop(rx);
        recorder.record_account(account(1));
    }

    #[test]
    fn test_recorder_sends_in_order() {
        let (recorder, mut rx) = Recorder::channel();
        recorder.record_account(account(1));
        recorder.record_reservation(ReservationRecord::new(
            CustomerId(1),
            ReservationId(1),
            &TripDetails::new("SP", "RJ", "01/01/2025"),
        ));

        assert!(matches!(rx.try_recv(), Ok(LedgerEntry::Account(_))));
        assert!(matches!(rx.try_recv(), Ok(LedgerEntry::Reservation(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_writer_drains_after_senders_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger");
        let ledger = LmdbLedger::open(&path, 10 * 1024 * 1024).unwrap();
        let (writer, recorder) = LedgerWriter::new(ledger);
        let handle = writer.spawn();

        for id in 1..=100 {
            recorder.record_account(account(id));
        }
        drop(recorder);

        assert_eq!(handle.await.unwrap(), 100);

        let ledger = LmdbLedger::open(&path, 10 * 1024 * 1024).unwrap();
        let ids: Vec<u64> = ledger
            .entries()
            .unwrap()
            .iter()
            .map(|e| e.customer_id().get())
            .collect();
        assert_eq!(ids, (1..=100).collect::<Vec<_>>());
    }
}
