use std::path::Path;

use fastrace::trace;
use heed::types::*;
use heed::{Database, Env, EnvOpenOptions};
use rota_types::LedgerEntry;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] heed::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only store of ledger entries keyed by a zero-padded sequence number,
/// so key order is append order.
pub struct LmdbLedger {
    env: Env,
    db: Database<Str, Str>,
}

impl LmdbLedger {
    pub fn open(path: &Path, map_size: u64) -> Result<Self, LedgerError> {
        std::fs::create_dir_all(path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size as usize)
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let db = env.create_database(&mut wtxn, None)?;
        wtxn.commit()?;

        Ok(Self { env, db })
    }

    pub fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.append_many(std::slice::from_ref(entry)).map(|_| ())
    }

    /// Writes the whole batch in one transaction. Nothing is written on error.
    #[trace]
    pub fn append_many(&self, entries: &[LedgerEntry]) -> Result<usize, LedgerError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut wtxn = self.env.write_txn()?;
        // Entries are never deleted, so the count is the next sequence number.
        let mut seq = self.db.len(&wtxn)?;
        for entry in entries {
            let value = serde_json::to_string(entry)?;
            self.db.put(&mut wtxn, &sequence_key(seq), &value)?;
            seq += 1;
        }
        wtxn.commit()?;

        Ok(entries.len())
    }

    pub fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        let rtxn = self.env.read_txn()?;
        let mut entries = Vec::new();
        for item in self.db.iter(&rtxn)? {
            let (key, value) = item?;
            match serde_json::from_str(value) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping unreadable ledger entry {}: {}", key, e),
            }
        }
        Ok(entries)
    }

    pub fn len(&self) -> u64 {
        self.env
            .read_txn()
            .and_then(|rtxn| self.db.len(&rtxn))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sequence_key(seq: u64) -> String {
    format!("{:020}", seq)
}
