//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function. Items are
//! written to stdout as one JSON document per line; status messages go to
//! stderr.

pub mod check;
pub mod devices;
pub mod poll;
pub mod recordings;

use crate::actions::OutputItem;
use crate::error::Result;
use serde_json::Value;
use std::io::Write;

/// Write one JSON document per line to `out`
pub fn write_json_lines<'a, W, I>(out: &mut W, values: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Value>,
{
    for value in values {
        serde_json::to_writer(&mut *out, value)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Print the JSON part of action output items to stdout
pub fn print_items(items: &[OutputItem]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_json_lines(&mut lock, items.iter().map(|item| &item.json))
}
