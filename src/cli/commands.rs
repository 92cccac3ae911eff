//! CLI command implementations
//!
//! Each invocation: load config, open the ledger, run one record manager
//! operation, write one JSON response.

use std::fs;
use std::io;

use serde_json::{json, Value};

use crate::ledger::{FileLedger, LedgerStore, MemoryLedger};
use crate::manager::{Operation, RecordError, RecordManager, RecordResult};
use crate::observability::{log_event, Event, Logger, RequestScope, Severity};
use crate::patient::Patient;

use super::args::{Cli, Command};
use super::config::{Backend, Config};
use super::errors::{CliError, CliResult};
use super::io::{read_patient_stdin, write_error, write_response};

/// One record manager operation with its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Seed,
    Create(Patient),
    Update(Patient),
    Read(String),
    Exists(String),
    Delete(String),
    List,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = Config::load(&cli.config)?;
    Logger::set_min_severity(config.min_severity()?);
    log_event(
        Event::ConfigLoaded,
        &[
            ("config", &cli.config.display().to_string()),
            ("data_dir", &config.data_dir),
        ],
    );

    if cli.command == Command::Init {
        return init(&config);
    }

    let request = build_request(&cli.command)?;
    let ledger = open_ledger(&config)?;
    serve(ledger.as_ref(), cli.command.name(), &request)
}

/// Create the data directory and an empty journal.
///
/// Fails if the journal already exists.
pub fn init(config: &Config) -> CliResult<()> {
    fs::create_dir_all(config.data_path()).map_err(|e| {
        CliError::io_error(format!(
            "Failed to create data directory {}: {}",
            config.data_dir, e
        ))
    })?;

    if config.backend == Backend::File {
        let journal = config.journal_path();
        if journal.exists() {
            return Err(CliError::already_initialized(journal.display()));
        }
        FileLedger::open(&journal, config.sync_writes)?;
        log_event(
            Event::LedgerInitialized,
            &[("path", &journal.display().to_string())],
        );
    }

    write_response(&mut io::stdout(), json!({ "initialized": config.data_dir }))
}

/// Open the configured ledger.
///
/// A file ledger must have been created by `init`.
pub fn open_ledger(config: &Config) -> CliResult<Box<dyn LedgerStore>> {
    match config.backend {
        Backend::Memory => Ok(Box::new(MemoryLedger::new())),
        Backend::File => {
            let journal = config.journal_path();
            if !journal.exists() {
                return Err(CliError::not_initialized(journal.display()));
            }

            let path = journal.display().to_string();
            log_event(Event::LedgerOpenBegin, &[("path", &path)]);

            let ledger = FileLedger::open(&journal, config.sync_writes).map_err(|e| {
                if e.is_fatal() {
                    log_event(Event::LedgerCorruption, &[("path", &path), ("reason", &e.to_string())]);
                }
                CliError::from(e)
            })?;

            let entries = ledger.entry_count()?.to_string();
            let keys = ledger.key_count()?.to_string();
            log_event(
                Event::LedgerReplayComplete,
                &[("entries", &entries), ("keys", &keys), ("path", &path)],
            );
            Ok(Box::new(ledger))
        }
    }
}

fn build_request(command: &Command) -> CliResult<Request> {
    Ok(match command {
        Command::Init => {
            return Err(CliError::invalid_input("init is not a record request"));
        }
        Command::Seed => Request::Seed,
        Command::Create => Request::Create(read_patient_stdin()?),
        Command::Update => Request::Update(read_patient_stdin()?),
        Command::Read { nin } => Request::Read(nin.clone()),
        Command::Exists { nin } => Request::Exists(nin.clone()),
        Command::Delete { nin } => Request::Delete(nin.clone()),
        Command::List => Request::List,
    })
}

fn serve(ledger: &dyn LedgerStore, command: &'static str, request: &Request) -> CliResult<()> {
    let scope = RequestScope::begin(command);
    let mut stdout = io::stdout();

    match execute(&RecordManager::new(), ledger, request) {
        Ok(data) => {
            if let Request::Seed = request {
                let count = data["seeded"].to_string();
                log_event(Event::SeedComplete, &[("count", &count)]);
            }
            write_response(&mut stdout, data)?;
            scope.complete(&[]);
            Ok(())
        }
        Err(e) => {
            let message = e.to_string();
            write_error(&mut stdout, e.code(), &message, e.nin())?;
            let (severity, fields) = rejection(&e, &message);
            scope.reject(severity, &fields);
            Err(CliError::request_failed(&e))
        }
    }
}

/// Log severity and fields for a failed request.
///
/// Precondition failures are the caller's mistake and log at WARN; ledger
/// and data failures log at ERROR with the ledger's own code attached.
fn rejection<'a>(e: &'a RecordError, message: &'a str) -> (Severity, Vec<(&'static str, &'a str)>) {
    let mut fields = vec![("code", e.code()), ("reason", message)];
    if let Some(nin) = e.nin() {
        fields.push(("nin", nin));
    }
    if let Some(source) = e.ledger_error() {
        fields.push(("ledger_code", source.code()));
    }

    let severity = if e.is_precondition() {
        Severity::Warn
    } else {
        Severity::Error
    };
    (severity, fields)
}

/// Run one request against `ledger` and build the response payload.
pub fn execute(
    manager: &RecordManager,
    ledger: &dyn LedgerStore,
    request: &Request,
) -> RecordResult<Value> {
    match request {
        Request::Seed => {
            let count = manager.seed_demo(ledger)?;
            Ok(json!({ "seeded": count }))
        }
        Request::Create(patient) => {
            manager.create(ledger, patient)?;
            Ok(json!({ "nin": patient.nin, "created": true }))
        }
        Request::Update(patient) => {
            manager.update(ledger, patient)?;
            Ok(json!({ "nin": patient.nin, "updated": true }))
        }
        Request::Read(nin) => {
            let patient = manager.read(ledger, nin)?;
            document(&patient, Operation::Read)
        }
        Request::Exists(nin) => {
            let exists = manager.exists(ledger, nin)?;
            Ok(json!({ "nin": nin, "exists": exists }))
        }
        Request::Delete(nin) => {
            manager.delete(ledger, nin)?;
            Ok(json!({ "nin": nin, "deleted": true }))
        }
        Request::List => {
            let patients = manager.list_all(ledger)?;
            let documents = patients
                .iter()
                .map(|p| document(p, Operation::ListAll))
                .collect::<RecordResult<Vec<Value>>>()?;
            Ok(Value::Array(documents))
        }
    }
}

fn document(patient: &Patient, operation: Operation) -> RecordResult<Value> {
    serde_json::to_value(patient).map_err(|source| RecordError::Encode {
        operation,
        nin: patient.nin.clone(),
        source,
    })
}
