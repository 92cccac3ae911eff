//! Range-scan iterators
//!
//! A scan yields `(key, value)` pairs in ascending key order, exactly once.
//! Iterators are not restartable. Callers must `close` them when done.

use super::errors::{LedgerError, LedgerResult};

/// A single `(key, value)` pair produced by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One-pass cursor over a range scan.
pub trait StateIterator: Send {
    /// Returns whether another entry can be requested.
    fn has_next(&self) -> bool;

    /// Advances the cursor and returns the next entry.
    fn next_entry(&mut self) -> LedgerResult<KeyValue>;

    /// Releases the cursor. Subsequent calls are no-ops.
    fn close(&mut self) -> LedgerResult<()>;
}

/// Iterator over entries captured when the scan was opened.
///
/// Used by the in-process ledgers: later writes do not affect an open scan.
#[derive(Debug)]
pub struct SnapshotIterator {
    entries: std::vec::IntoIter<KeyValue>,
    remaining: usize,
    closed: bool,
}

impl SnapshotIterator {
    pub fn new(entries: Vec<KeyValue>) -> Self {
        let remaining = entries.len();
        Self {
            entries: entries.into_iter(),
            remaining,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl StateIterator for SnapshotIterator {
    fn has_next(&self) -> bool {
        !self.closed && self.remaining > 0
    }

    fn next_entry(&mut self) -> LedgerResult<KeyValue> {
        if self.closed {
            return Err(LedgerError::backend("range scan iterator already closed"));
        }
        match self.entries.next() {
            Some(entry) => {
                self.remaining -= 1;
                Ok(entry)
            }
            None => Err(LedgerError::backend("range scan iterator exhausted")),
        }
    }

    fn close(&mut self) -> LedgerResult<()> {
        self.closed = true;
        self.remaining = 0;
        Ok(())
    }
}
