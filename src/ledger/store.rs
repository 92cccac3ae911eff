//! The ledger store contract
//!
//! Four primitives over an ordered key space. Each primitive is applied
//! atomically by the store; nothing above this trait assumes more.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use super::errors::{LedgerError, LedgerResult};
use super::iterator::{KeyValue, StateIterator};

/// Trait for an ordered key-value ledger
pub trait LedgerStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any existing value.
    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> LedgerResult<()>;

    /// Open an ordered scan over `[start, end)`.
    ///
    /// An empty `start` or `end` leaves that side of the range unbounded,
    /// so `range_scan("", "")` visits the whole namespace.
    fn range_scan(&self, start: &str, end: &str) -> LedgerResult<Box<dyn StateIterator>>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> LedgerResult<()> {
        (**self).delete(key)
    }

    fn range_scan(&self, start: &str, end: &str) -> LedgerResult<Box<dyn StateIterator>> {
        (**self).range_scan(start, end)
    }
}

/// Rejects the empty key, which is reserved for unbounded scans.
pub fn validate_key(key: &str) -> LedgerResult<()> {
    if key.is_empty() {
        return Err(LedgerError::EmptyKey);
    }
    Ok(())
}

/// Copy the entries of `map` that fall in `[start, end)` in key order.
pub fn collect_range(map: &BTreeMap<String, Vec<u8>>, start: &str, end: &str) -> Vec<KeyValue> {
    // BTreeMap::range panics on an inverted range
    if !start.is_empty() && !end.is_empty() && start > end {
        return Vec::new();
    }

    let lower = if start.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start.to_string())
    };
    let upper = if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end.to_string())
    };

    map.range::<String, _>((lower, upper))
        .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
        .collect()
}
