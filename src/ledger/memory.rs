//! In-memory ledger
//!
//! Ordered map behind a lock. Nothing survives the process; used for tests
//! and for the `memory` backend.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::errors::LedgerResult;
use super::iterator::{SnapshotIterator, StateIterator};
use super::store::{collect_range, validate_key, LedgerStore};

/// In-memory ordered key-value ledger
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> LedgerResult<usize> {
        Ok(self.entries.read()?.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl LedgerStore for MemoryLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.entries.read()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        validate_key(key)?;
        self.entries
            .write()?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> LedgerResult<()> {
        validate_key(key)?;
        self.entries.write()?.remove(key);
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> LedgerResult<Box<dyn StateIterator>> {
        let entries = self.entries.read()?;
        Ok(Box::new(SnapshotIterator::new(collect_range(
            &entries, start, end,
        ))))
    }
}
