//! CLI commands.
//!
//! - [`run`] - Evaluate a function on a host payload
//! - [`check_config`] - Validate a merchant configuration value

pub mod check_config;
pub mod run;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use cart_rules_functions::{ConfigurationError, FunctionError};
use thiserror::Error;

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading the input file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The function rejected the payload.
    #[error("Function failed: {0}")]
    Function(#[from] FunctionError),

    /// The configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The output could not be rendered.
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Read a whole file, or stdin when no path is given.
fn read_source(path: Option<&Path>) -> Result<String, CommandError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CommandError::Read {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().lock().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Write `text` and a trailing newline to stdout.
fn write_stdout(text: &str) -> Result<(), CommandError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
