//! Observability
//!
//! Structured JSON logging for the command-line front end and ledger
//! lifecycle. The record manager itself does not log.
//!
//! ```ignore
//! use patientledger::observability::{Event, Logger, RequestScope};
//!
//! Logger::event(Event::ConfigLoaded, &[("data_dir", "/var/lib/patients")]);
//!
//! let scope = RequestScope::begin("read");
//! // ... run the command ...
//! scope.complete(&[("nin", "123456789")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{format_line, Logger, Severity};
pub use scope::RequestScope;

/// Log a lifecycle event with fields at the event's own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::event(event, fields);
}
