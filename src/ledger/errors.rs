//! Ledger error types
//!
//! Error codes:
//! - LEDGER_IO_ERROR (ERROR severity)
//! - LEDGER_CORRUPTION (FATAL severity)
//! - LEDGER_EMPTY_KEY (ERROR severity)
//! - LEDGER_POISONED (ERROR severity)
//! - LEDGER_HALTED (ERROR severity)
//! - LEDGER_BACKEND_ERROR (ERROR severity)

use std::io;

use thiserror::Error;

/// Result type for ledger primitives
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures raised by a ledger store primitive.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Disk I/O failure while reading or appending the journal
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Journal bytes failed verification
    #[error("journal corruption at byte_offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// Keys must be non-empty strings
    #[error("key must not be an empty string")]
    EmptyKey,

    /// A writer panicked while holding the ledger lock
    #[error("ledger lock poisoned")]
    Poisoned,

    /// A failed append could not be rolled back; the journal tail is torn
    #[error("journal halted: torn entry at byte_offset {offset} could not be rolled back")]
    Halted { offset: u64 },

    /// Failure reported by a substitute store
    #[error("{0}")]
    Backend(String),
}

impl LedgerError {
    /// Wrap an I/O error with a description of what was attempted
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a corruption error at the given journal offset
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Create a backend error from a plain message
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "LEDGER_IO_ERROR",
            Self::Corruption { .. } => "LEDGER_CORRUPTION",
            Self::EmptyKey => "LEDGER_EMPTY_KEY",
            Self::Poisoned => "LEDGER_POISONED",
            Self::Halted { .. } => "LEDGER_HALTED",
            Self::Backend(_) => "LEDGER_BACKEND_ERROR",
        }
    }

    /// Corruption means the journal cannot be trusted and the process must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Corruption { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for LedgerError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
