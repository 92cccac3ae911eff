//! Record Manager
//!
//! Enforces existence preconditions around the ledger and maps ledger
//! outcomes onto `RecordError`. The manager holds no state: the ledger is
//! passed into every call.
//!
//! # Check-then-act
//!
//! `create`, `update` and `delete` read the key and then mutate it in a
//! second, separate ledger call. Nothing here makes the pair atomic. If
//! another writer touches the same NIN between the two calls, the mutation
//! still goes ahead (a create may overwrite a record written in the gap, an
//! update may resurrect a record deleted in the gap). Serializing
//! conflicting writes to one key is the ledger's responsibility.

use crate::ledger::{LedgerStore, StateIterator};
use crate::patient::{demo_patients, Patient};

use super::errors::{Operation, RecordError, RecordResult};

/// Stateless patient record manager
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordManager;

impl RecordManager {
    pub fn new() -> Self {
        Self
    }

    /// Returns true when a non-empty value is stored under `nin`.
    ///
    /// An absent key or an empty value is `Ok(false)`, never an error.
    pub fn exists<L: LedgerStore + ?Sized>(&self, ledger: &L, nin: &str) -> RecordResult<bool> {
        self.probe(ledger, nin, Operation::Exists)
    }

    /// Stores a new record.
    ///
    /// Fails with `AlreadyExists` if the NIN is present. On any failure
    /// before the put, nothing has been written.
    pub fn create<L: LedgerStore + ?Sized>(&self, ledger: &L, patient: &Patient) -> RecordResult<()> {
        if self.probe(ledger, &patient.nin, Operation::Create)? {
            return Err(RecordError::AlreadyExists {
                nin: patient.nin.clone(),
            });
        }
        self.write(ledger, patient, Operation::Create)
    }

    /// Loads the record stored under `nin`.
    ///
    /// An empty stored value reads as `NotFound`, agreeing with `exists`.
    pub fn read<L: LedgerStore + ?Sized>(&self, ledger: &L, nin: &str) -> RecordResult<Patient> {
        let bytes = ledger
            .get(nin)
            .map_err(|source| RecordError::StoreRead {
                operation: Operation::Read,
                nin: Some(nin.to_string()),
                source,
            })?
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| RecordError::NotFound {
                nin: nin.to_string(),
            })?;

        Patient::decode(&bytes).map_err(|source| RecordError::Decode {
            operation: Operation::Read,
            nin: nin.to_string(),
            source,
        })
    }

    /// Replaces every field of an existing record.
    ///
    /// Fails with `NotFound` if the NIN is absent. There is no merge with the
    /// stored record.
    pub fn update<L: LedgerStore + ?Sized>(&self, ledger: &L, patient: &Patient) -> RecordResult<()> {
        if !self.probe(ledger, &patient.nin, Operation::Update)? {
            return Err(RecordError::NotFound {
                nin: patient.nin.clone(),
            });
        }
        self.write(ledger, patient, Operation::Update)
    }

    /// Removes an existing record.
    pub fn delete<L: LedgerStore + ?Sized>(&self, ledger: &L, nin: &str) -> RecordResult<()> {
        if !self.probe(ledger, nin, Operation::Delete)? {
            return Err(RecordError::NotFound {
                nin: nin.to_string(),
            });
        }
        ledger
            .delete(nin)
            .map_err(|source| RecordError::StoreWrite {
                operation: Operation::Delete,
                nin: nin.to_string(),
                source,
            })
    }

    /// Returns every record in ascending NIN order.
    ///
    /// All or nothing: a failure opening the scan, advancing it, or decoding
    /// an entry discards everything collected so far. The scan is closed
    /// exactly once whichever way the loop exits.
    pub fn list_all<L: LedgerStore + ?Sized>(&self, ledger: &L) -> RecordResult<Vec<Patient>> {
        let iter = ledger
            .range_scan("", "")
            .map_err(|source| RecordError::StoreRead {
                operation: Operation::ListAll,
                nin: None,
                source,
            })?;
        let mut scan = ScanGuard::new(iter);

        let mut patients = Vec::new();
        while scan.has_next() {
            let entry = scan.next_entry().map_err(|source| RecordError::StoreRead {
                operation: Operation::ListAll,
                nin: None,
                source,
            })?;

            let patient = Patient::decode(&entry.value).map_err(|source| RecordError::Decode {
                operation: Operation::ListAll,
                nin: entry.key.clone(),
                source,
            })?;
            patients.push(patient);
        }

        Ok(patients)
    }

    /// Writes each record unconditionally, in order.
    ///
    /// Stops at the first failure. Records written before the failure stay
    /// written. Returns the number of records written.
    pub fn seed_initial<L: LedgerStore + ?Sized>(
        &self,
        ledger: &L,
        patients: &[Patient],
    ) -> RecordResult<usize> {
        for patient in patients {
            self.write(ledger, patient, Operation::Seed)?;
        }
        Ok(patients.len())
    }

    /// Seeds the fixed demonstration dataset.
    pub fn seed_demo<L: LedgerStore + ?Sized>(&self, ledger: &L) -> RecordResult<usize> {
        self.seed_initial(ledger, &demo_patients())
    }

    fn probe<L: LedgerStore + ?Sized>(
        &self,
        ledger: &L,
        nin: &str,
        operation: Operation,
    ) -> RecordResult<bool> {
        let value = ledger.get(nin).map_err(|source| RecordError::StoreRead {
            operation,
            nin: Some(nin.to_string()),
            source,
        })?;
        Ok(value.map_or(false, |bytes| !bytes.is_empty()))
    }

    fn write<L: LedgerStore + ?Sized>(
        &self,
        ledger: &L,
        patient: &Patient,
        operation: Operation,
    ) -> RecordResult<()> {
        let bytes = patient.encode().map_err(|source| RecordError::Encode {
            operation,
            nin: patient.nin.clone(),
            source,
        })?;

        ledger
            .put(&patient.nin, &bytes)
            .map_err(|source| RecordError::StoreWrite {
                operation,
                nin: patient.nin.clone(),
                source,
            })
    }
}

/// Closes the wrapped scan when dropped.
struct ScanGuard {
    iter: Box<dyn StateIterator>,
}

impl ScanGuard {
    fn new(iter: Box<dyn StateIterator>) -> Self {
        Self { iter }
    }
}

impl std::ops::Deref for ScanGuard {
    type Target = dyn StateIterator;

    fn deref(&self) -> &Self::Target {
        self.iter.as_ref()
    }
}

impl std::ops::DerefMut for ScanGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.iter.as_mut()
    }
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        // close errors have nowhere to go once the result is decided
        let _ = self.iter.close();
    }
}
