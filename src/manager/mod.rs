//! Record Manager subsystem
//!
//! The create/read/update/delete/list contract for patient records over a
//! `LedgerStore`.
//!
//! # Guarantees
//!
//! - At most one record per NIN; the ledger key is the NIN
//! - Create requires absence, update and delete require presence
//! - A failed existence check never results in a write
//! - Update is a full replace
//! - list_all returns the complete ordered set or an error, never a prefix
//!
//! The manager never logs. Callers see exactly one result per call.

mod errors;
mod manager;

pub use errors::{Operation, RecordError, RecordResult};
pub use manager::RecordManager;
