//! Sub-library declarations.
//!
//! One declaration per `sub-lib-config` line:
//!
//! ```text
//! (sublib (type sym|fp)(path <dir>)(table <file>|AUTO)(pathvar <name>))
//! ```
//!
//! Fields are pulled out independently, so their order does not matter and
//! unknown trailing content is ignored.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::table::LibKind;

/// Prefix every declaration line starts with.
pub const SUBLIB_PREFIX: &str = "(sublib ";

/// Table value that requests a directory scan.
pub const AUTO_TABLE: &str = "AUTO";

macro_rules! field_regex {
    ($name:ident, $field:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(r"\(", $field, r#"\s+("[^"]*"|[^()]*?)\s*\)"#))
                .expect("field regex is valid")
        });
    };
}

field_regex!(TYPE_FIELD, "type");
field_regex!(PATH_FIELD, "path");
field_regex!(TABLE_FIELD, "table");
field_regex!(PATHVAR_FIELD, "pathvar");

/// Where a sub-library's entries come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Scan the sub-library directory for libraries.
    Auto,
    /// Read an existing table file. Relative paths are taken from the
    /// config file's directory.
    File(PathBuf),
}

/// A single `(sublib ...)` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubLibrary {
    /// Which table the entries go to.
    pub kind: LibKind,
    /// Sub-library directory, as written in the config. Only needed for
    /// `AUTO` scans, the default table location and `pathvar` rewrites.
    pub path: Option<String>,
    /// Entry source.
    pub table: TableSource,
    /// Path variable to re-root under `${KIPRJMOD}/<path>`.
    pub path_var: Option<String>,
}

impl SubLibrary {
    /// Parses one config line.
    ///
    /// Returns `None` for lines that are not declarations, lines whose
    /// `type` is missing or not `sym`/`fp`, and lines that need a `path`
    /// (`AUTO`, no `table`, or a `pathvar`) but have none.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_start();
        if !line.starts_with(SUBLIB_PREFIX) {
            return None;
        }

        let Some(type_key) = capture(&TYPE_FIELD, line) else {
            tracing::debug!(line, "Skipping sublib without type");
            return None;
        };
        let Some(kind) = LibKind::from_key(type_key) else {
            tracing::warn!(line, type_key, "Skipping sublib with unknown type");
            return None;
        };

        let path = capture(&PATH_FIELD, line);
        let path_var = capture(&PATHVAR_FIELD, line);

        let table = match (capture(&TABLE_FIELD, line), path) {
            (Some(AUTO_TABLE), Some(_)) => TableSource::Auto,
            (Some(file), _) if file != AUTO_TABLE => TableSource::File(PathBuf::from(file)),
            (None, Some(path)) => TableSource::File(PathBuf::from(format!(
                "{path}/{}",
                kind.table_file_name()
            ))),
            _ => {
                tracing::debug!(line, "Skipping sublib without path");
                return None;
            }
        };

        if path_var.is_some() && path.is_none() {
            tracing::debug!(line, "Skipping sublib with pathvar but no path");
            return None;
        }

        Some(Self {
            kind,
            path: path.map(str::to_string),
            table,
            path_var: path_var.map(str::to_string),
        })
    }
}

/// Returns the unquoted, non-empty value of the first match of `field`.
fn capture<'a>(field: &Regex, line: &'a str) -> Option<&'a str> {
    let value = field.captures(line)?.get(1)?.as_str();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    (!value.is_empty()).then_some(value)
}
