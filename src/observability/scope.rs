//! Per-request logging scope
//!
//! - Logs REQUEST_BEGIN on creation
//! - Logs REQUEST_COMPLETE or REQUEST_REJECTED when finished
//! - Logs a WARN line if dropped without either

use std::time::Instant;

use uuid::Uuid;

use super::events::Event;
use super::logger::{Logger, Severity};

/// Tracks one command invocation: its id, its name, and how long it took.
pub struct RequestScope {
    request_id: Uuid,
    command: &'static str,
    started_at: Instant,
    finished: bool,
}

impl RequestScope {
    pub fn begin(command: &'static str) -> Self {
        let scope = Self {
            request_id: Uuid::new_v4(),
            command,
            started_at: Instant::now(),
            finished: false,
        };
        let id = scope.request_id.to_string();
        Logger::event(Event::RequestBegin, &[("command", command), ("request_id", &id)]);
        scope
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// Finish successfully with extra fields.
    pub fn complete(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        self.emit(Event::RequestComplete.severity(), Event::RequestComplete, extra);
    }

    /// Finish with a failure, logged at `severity` with the given fields.
    pub fn reject(mut self, severity: Severity, extra: &[(&str, &str)]) {
        self.finished = true;
        self.emit(severity, Event::RequestRejected, extra);
    }

    fn emit(&self, severity: Severity, event: Event, extra: &[(&str, &str)]) {
        let id = self.request_id.to_string();
        let elapsed = self.elapsed_ms().to_string();
        let mut fields: Vec<(&str, &str)> = vec![
            ("command", self.command),
            ("elapsed_ms", &elapsed),
            ("request_id", &id),
        ];
        fields.extend_from_slice(extra);
        Logger::log(severity, event, &fields);
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        if !self.finished {
            let id = self.request_id.to_string();
            Logger::log(
                Severity::Warn,
                Event::RequestRejected,
                &[
                    ("command", self.command),
                    ("reason", "request dropped without completion"),
                    ("request_id", &id),
                ],
            );
        }
    }
}
