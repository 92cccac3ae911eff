//! Record manager error taxonomy
//!
//! Error codes:
//! - PATIENT_STORE_READ_FAILED: ledger get or range scan failed
//! - PATIENT_STORE_WRITE_FAILED: ledger put or delete failed
//! - PATIENT_DECODE_FAILED: stored bytes are not a valid patient document
//! - PATIENT_ENCODE_FAILED: a patient could not be serialized
//! - PATIENT_NOT_FOUND: operation requires an existing record
//! - PATIENT_ALREADY_EXISTS: create requires an absent record

use std::fmt;

use thiserror::Error;

use crate::ledger::LedgerError;

/// Result type for record manager operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record manager operation names, carried in errors for context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Exists,
    Create,
    Read,
    Update,
    Delete,
    ListAll,
    Seed,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Exists => "exists",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ListAll => "list_all",
            Operation::Seed => "seed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn subject(nin: &Option<String>) -> String {
    match nin {
        Some(nin) => format!("patient {}", nin),
        None => "all patients".to_string(),
    }
}

/// Errors surfaced to callers of the record manager
#[derive(Debug, Error)]
pub enum RecordError {
    /// The underlying get or range scan failed
    #[error("{operation}: failed to read from ledger for {}: {source}", subject(.nin))]
    StoreRead {
        operation: Operation,
        nin: Option<String>,
        #[source]
        source: LedgerError,
    },

    /// The underlying put or delete failed
    #[error("{operation}: failed to write to ledger for patient {nin}: {source}")]
    StoreWrite {
        operation: Operation,
        nin: String,
        #[source]
        source: LedgerError,
    },

    /// Stored bytes do not decode into a patient
    #[error("{operation}: stored document for patient {nin} is malformed: {source}")]
    Decode {
        operation: Operation,
        nin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A patient could not be serialized
    #[error("{operation}: failed to encode patient {nin}: {source}")]
    Encode {
        operation: Operation,
        nin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("the patient with NIN {nin} does not exist")]
    NotFound { nin: String },

    #[error("the patient with NIN {nin} already exists")]
    AlreadyExists { nin: String },
}

impl RecordError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreRead { .. } => "PATIENT_STORE_READ_FAILED",
            Self::StoreWrite { .. } => "PATIENT_STORE_WRITE_FAILED",
            Self::Decode { .. } => "PATIENT_DECODE_FAILED",
            Self::Encode { .. } => "PATIENT_ENCODE_FAILED",
            Self::NotFound { .. } => "PATIENT_NOT_FOUND",
            Self::AlreadyExists { .. } => "PATIENT_ALREADY_EXISTS",
        }
    }

    /// The NIN the failing operation was addressing, if it addressed one.
    pub fn nin(&self) -> Option<&str> {
        match self {
            Self::StoreRead { nin, .. } => nin.as_deref(),
            Self::StoreWrite { nin, .. }
            | Self::Decode { nin, .. }
            | Self::Encode { nin, .. }
            | Self::NotFound { nin }
            | Self::AlreadyExists { nin } => Some(nin),
        }
    }

    /// The ledger failure underneath, for store errors.
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        match self {
            Self::StoreRead { source, .. } | Self::StoreWrite { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Precondition failures are the caller's to fix; everything else is a
    /// storage or data problem.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AlreadyExists { .. })
    }
}
