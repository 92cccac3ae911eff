//! Ledger Store subsystem
//!
//! An ordered key-value ledger exposing four primitives: get, put, delete
//! and range_scan. The record manager reaches the ledger only through the
//! `LedgerStore` trait, so any store honoring the contract can sit behind it.
//!
//! # Implementations
//!
//! - `MemoryLedger`: ordered map, nothing persisted
//! - `FileLedger`: append-only checksummed journal, replayed on open
//!
//! # Contract
//!
//! - Each primitive is atomic on its own; there are no multi-key transactions
//! - Keys are non-empty strings; the empty string only appears as an
//!   unbounded range_scan bound
//! - range_scan yields entries in ascending key order, start inclusive,
//!   end exclusive

mod checksum;
mod entry;
mod errors;
mod file;
mod iterator;
mod memory;
mod store;

pub use errors::{LedgerError, LedgerResult};
pub use file::FileLedger;
pub use iterator::{KeyValue, SnapshotIterator, StateIterator};
pub use memory::MemoryLedger;
pub use store::LedgerStore;
