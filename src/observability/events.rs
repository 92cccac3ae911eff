//! Observable events
//!
//! Events are explicit and typed; each one has a fixed wire name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,

    // Ledger lifecycle
    LedgerOpenBegin,
    LedgerReplayComplete,
    LedgerInitialized,
    /// Journal failed verification (FATAL)
    LedgerCorruption,

    // Requests
    RequestBegin,
    RequestComplete,
    /// Request ended with a record or ledger error
    RequestRejected,

    // Seeding
    SeedComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::LedgerOpenBegin => "LEDGER_OPEN_BEGIN",
            Event::LedgerReplayComplete => "LEDGER_REPLAY_COMPLETE",
            Event::LedgerInitialized => "LEDGER_INITIALIZED",
            Event::LedgerCorruption => "LEDGER_CORRUPTION",
            Event::RequestBegin => "REQUEST_BEGIN",
            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::SeedComplete => "SEED_COMPLETE",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::LedgerCorruption)
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::LedgerCorruption => Severity::Fatal,
            Event::RequestRejected => Severity::Error,
            Event::RequestBegin => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_corruption_is_fatal() {
        assert!(Event::LedgerCorruption.is_fatal());
        assert_eq!(Event::LedgerCorruption.severity(), Severity::Fatal);
        assert!(!Event::RequestRejected.is_fatal());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Event::RequestComplete.as_str(), "REQUEST_COMPLETE");
        assert_eq!(Event::LedgerReplayComplete.to_string(), "LEDGER_REPLAY_COMPLETE");
    }
}
