//! CLI argument definitions using clap
//!
//! - patientledger [--config <path>] init
//! - patientledger [--config <path>] seed
//! - patientledger [--config <path>] create < patient.json
//! - patientledger [--config <path>] update < patient.json
//! - patientledger [--config <path>] read --nin <nin>
//! - patientledger [--config <path>] exists --nin <nin>
//! - patientledger [--config <path>] delete --nin <nin>
//! - patientledger [--config <path>] list

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// patientledger - patient records over an ordered key-value ledger
#[derive(Parser, Debug)]
#[command(name = "patientledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./patientledger.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the data directory and an empty ledger journal
    Init,

    /// Load the demonstration patients
    Seed,

    /// Create a patient from a JSON document on stdin
    Create,

    /// Replace a patient from a JSON document on stdin
    Update,

    /// Print one patient
    Read {
        #[arg(long)]
        nin: String,
    },

    /// Report whether a patient exists
    Exists {
        #[arg(long)]
        nin: String,
    },

    /// Delete one patient
    Delete {
        #[arg(long)]
        nin: String,
    },

    /// Print every patient in NIN order
    List,
}

impl Command {
    /// Name used in request logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::Seed => "seed",
            Command::Create => "create",
            Command::Update => "update",
            Command::Read { .. } => "read",
            Command::Exists { .. } => "exists",
            Command::Delete { .. } => "delete",
            Command::List => "list",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
