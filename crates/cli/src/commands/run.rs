//! Run a function on a host payload.
//!
//! # Usage
//!
//! ```bash
//! # Payload from a file
//! cart-rules run cart-validation --input payload.json
//!
//! # Payload from stdin, indented output
//! cat payload.json | cart-rules run tiered-discount --pretty
//! ```

use std::path::Path;

use cart_rules_functions::{FunctionKind, FunctionSettings};
use tracing::info;

use super::{CommandError, read_source, write_stdout};

/// Read the payload, run the function and print its output.
///
/// # Errors
///
/// Returns an error if the payload cannot be read, the function fails, or
/// stdout cannot be written.
pub fn execute(
    function: FunctionKind,
    input: Option<&Path>,
    pretty: bool,
    settings: FunctionSettings,
) -> Result<(), CommandError> {
    let payload = read_source(input)?;
    let output = render(function, &payload, pretty, settings)?;

    info!(%function, bytes = output.len(), "Function completed");
    write_stdout(&output)
}

/// Run the function and render its output as JSON text.
fn render(
    function: FunctionKind,
    payload: &str,
    pretty: bool,
    settings: FunctionSettings,
) -> Result<String, CommandError> {
    let output = function.run(payload, settings)?;
    let text = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(text)
}
