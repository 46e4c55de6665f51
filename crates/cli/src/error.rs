//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success (including a render stopped by the abort flag)
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: render error (unknown field or noise, rejected LIC parameters)
//! - 11: I/O error (spec file read, PNG write)
//! - 12: input error (bad JSON params or spec, missing field name)
//! - 13: serialization error

use lic_harness::HarnessError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// The field registry or the LIC core refused the request.
    Render(HarnessError),
    /// A file could not be read or written.
    Io(String),
    /// A user input error.
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<HarnessError> for CliError {
    fn from(e: HarnessError) -> Self {
        match e {
            HarnessError::Io(msg) => CliError::Io(msg),
            HarnessError::InvalidSpec(msg) => CliError::Input(msg),
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
