//! Output helpers shared by commands

use serde::Serialize;

use postindex_core::error::Result;
pub use postindex_core::format::OutputFormat;

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
