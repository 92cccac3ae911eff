//! Patient records
//!
//! The single entity type managed by the ledger, plus the demonstration
//! dataset used for seeding.

mod demo;
mod record;

pub use demo::demo_patients;
pub use record::Patient;
