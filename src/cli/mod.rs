//! Command-line front end
//!
//! One record manager operation per invocation:
//! - init: create the data directory and journal
//! - seed: load the demonstration patients
//! - create / update: patient document on stdin
//! - read / exists / delete: by `--nin`
//! - list: every patient in NIN order

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, init, open_ledger, run, run_command, Request};
pub use config::{Backend, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_patient, write_error, write_response};
