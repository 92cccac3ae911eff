//! patientledger - patient record management over an ordered key-value ledger
//!
//! Records are JSON documents keyed by national identification number (NIN).
//! The record manager enforces existence preconditions; the ledger supplies
//! ordered get/put/delete/range-scan primitives.

pub mod cli;
pub mod ledger;
pub mod manager;
pub mod observability;
pub mod patient;
