//! JSON I/O for the CLI
//!
//! - Input: one patient JSON document on stdin (create/update only)
//! - Output: one JSON object per invocation on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::patient::Patient;

/// Read a patient document from `reader`.
///
/// The document must carry every attribute; unknown attributes are rejected.
pub fn read_patient<R: Read>(reader: &mut R) -> CliResult<Patient> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input: expected a patient document"));
    }

    serde_json::from_str(&input)
        .map_err(|e| CliError::invalid_input(format!("Invalid patient document: {}", e)))
}

/// Read a patient document from stdin
pub fn read_patient_stdin() -> CliResult<Patient> {
    read_patient(&mut io::stdin().lock())
}

pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(writer, &response)
}

/// Write an error envelope; `nin` is included when the failure addressed one.
pub fn write_error<W: Write>(
    writer: &mut W,
    code: &str,
    message: &str,
    nin: Option<&str>,
) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if let Some(nin) = nin {
        response["nin"] = json!(nin);
    }
    write_line(writer, &response)
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
