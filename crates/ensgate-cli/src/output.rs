use std::io::{self, Write};

use ensgate_core::ToolResponse;

use crate::error::CliError;

pub fn render(response: &ToolResponse, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{payload}")?;
    Ok(())
}
