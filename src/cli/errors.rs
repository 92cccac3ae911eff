//! CLI error types
//!
//! Every CLI error ends the process with a non-zero exit status.

use std::fmt;
use std::io;

use crate::ledger::LedgerError;
use crate::manager::RecordError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing or invalid
    ConfigError,
    /// stdin/stdout failure
    IoError,
    /// Request body is not a valid patient document
    InvalidInput,
    /// `init` run against an existing journal
    AlreadyInitialized,
    /// Journal missing; `init` has not been run
    NotInitialized,
    /// Ledger could not be opened
    LedgerFailed,
    /// The record manager rejected the request
    RequestFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PATIENT_CLI_CONFIG_ERROR",
            Self::IoError => "PATIENT_CLI_IO_ERROR",
            Self::InvalidInput => "PATIENT_CLI_INVALID_INPUT",
            Self::AlreadyInitialized => "PATIENT_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "PATIENT_CLI_NOT_INITIALIZED",
            Self::LedgerFailed => "PATIENT_CLI_LEDGER_FAILED",
            Self::RequestFailed => "PATIENT_CLI_REQUEST_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn already_initialized(path: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Ledger journal already exists: {}", path),
        )
    }

    pub fn not_initialized(path: impl fmt::Display) -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            format!(
                "Ledger journal not found: {}. Run 'patientledger init' first.",
                path
            ),
        )
    }

    pub fn ledger_failed(err: &LedgerError) -> Self {
        Self::new(
            CliErrorCode::LedgerFailed,
            format!("{}: {}", err.code(), err),
        )
    }

    pub fn request_failed(err: &RecordError) -> Self {
        Self::new(
            CliErrorCode::RequestFailed,
            format!("{}: {}", err.code(), err),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<RecordError> for CliError {
    fn from(e: RecordError) -> Self {
        Self::request_failed(&e)
    }
}

impl From<LedgerError> for CliError {
    fn from(e: LedgerError) -> Self {
        Self::ledger_failed(&e)
    }
}

pub type CliResult<T> = Result<T, CliError>;
