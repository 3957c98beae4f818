//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use tornboard::Result;

pub mod json;
pub mod table;

/// Print `data` in the requested format.
///
/// JSON serializes `data` itself, table renders `rows`, and pretty defers to
/// the command's own `pretty` printer.
pub fn render<T, R, F>(format: OutputFormat, data: &T, rows: &[R], pretty: F) -> Result<()>
where
    T: Serialize + ?Sized,
    R: Tabled,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => println!("{}", json::format_json(data)?),
        OutputFormat::Table => println!("{}", table::format_table(rows)),
        OutputFormat::Pretty => pretty(),
    }
    Ok(())
}
