use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::CliError;

/// Serializes `value` to `destination`, or stdout when none is given.
pub fn write_json<T: Serialize>(
    value: &T,
    pretty: bool,
    destination: Option<&Path>,
) -> Result<(), CliError> {
    let mut rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    rendered.push('\n');

    match destination {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}
