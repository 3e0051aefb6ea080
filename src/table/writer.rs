//! Library table serialisation.
//!
//! Output is the kind's header token, one row per line, then the closing
//! `)` with no trailing newline. Existing files are overwritten in place.

use std::path::Path;

use super::LibTable;
use crate::error::{TableError, TableResult};

/// Closing token of every table file.
pub const TABLE_FOOTER: &str = ")";

/// Renders a table to its file contents.
#[must_use]
pub fn render(table: &LibTable) -> String {
    let capacity = table.entries().iter().map(|e| e.len() + 1).sum::<usize>() + 32;
    let mut out = String::with_capacity(capacity);

    out.push_str(table.kind().header());
    out.push('\n');
    for entry in table.entries() {
        out.push_str(entry);
        out.push('\n');
    }
    out.push_str(TABLE_FOOTER);
    out
}

/// Writes a table to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_table(table: &LibTable, path: &Path) -> TableResult<()> {
    std::fs::write(path, render(table)).map_err(|e| TableError::file_write(path, e))?;

    tracing::info!(
        path = %path.display(),
        entries = table.len(),
        "Wrote library table"
    );
    Ok(())
}
