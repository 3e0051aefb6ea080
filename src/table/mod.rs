//! KiCad library tables.
//!
//! A library table file lists one library per `(lib ...)` row:
//!
//! ```text
//! (sym_lib_table
//!   (lib (name <n>)(type <t>)(uri <u>)(options "<o>")(descr "<d>"))
//!   ...
//! )
//! ```
//!
//! Rows are kept as opaque text. Entries read from existing tables are
//! copied verbatim and entries from directory scans come from a fixed
//! template, so the third-party syntax is never decomposed.

pub mod resolver;
pub mod writer;

use std::fmt;

pub use resolver::resolve;
pub use writer::write_table;

/// Path variable KiCad expands to the current project's root.
pub const PROJECT_PATH_VAR: &str = "${KIPRJMOD}";

/// The two kinds of library table a KiCad project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibKind {
    /// Schematic symbol libraries (`sym-lib-table`).
    Symbol,
    /// PCB footprint libraries (`fp-lib-table`).
    Footprint,
}

impl LibKind {
    /// All kinds, in output order.
    pub const ALL: [Self; 2] = [Self::Symbol, Self::Footprint];

    /// Parses the `type` key used in `sub-lib-config` lines.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "sym" => Some(Self::Symbol),
            "fp" => Some(Self::Footprint),
            _ => None,
        }
    }

    /// The `type` key used in `sub-lib-config` lines.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Symbol => "sym",
            Self::Footprint => "fp",
        }
    }

    /// File name of the table, both for sub-projects and the merged output.
    #[must_use]
    pub const fn table_file_name(self) -> &'static str {
        match self {
            Self::Symbol => "sym-lib-table",
            Self::Footprint => "fp-lib-table",
        }
    }

    /// Opening token of the table file.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Symbol => "(sym_lib_table",
            Self::Footprint => "(fp_lib_table",
        }
    }

    /// Extension matched by AUTO directory scans.
    #[must_use]
    pub const fn scan_extension(self) -> &'static str {
        match self {
            Self::Symbol => "lib",
            Self::Footprint => "pretty",
        }
    }

    /// Library `type` field written for scanned entries.
    #[must_use]
    pub const fn scanned_lib_type(self) -> &'static str {
        match self {
            Self::Symbol => "Legacy",
            Self::Footprint => "KiCad",
        }
    }
}

impl fmt::Display for LibKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_file_name())
    }
}

/// An ordered list of `(lib ...)` rows of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibTable {
    kind: LibKind,
    entries: Vec<String>,
}

impl LibTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new(kind: LibKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Creates a table from existing rows.
    #[must_use]
    pub const fn with_entries(kind: LibKind, entries: Vec<String>) -> Self {
        Self { kind, entries }
    }

    /// Returns the table kind.
    #[must_use]
    pub const fn kind(&self) -> LibKind {
        self.kind
    }

    /// Returns the rows in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a single row.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// Appends every row of `other`, keeping its order.
    ///
    /// No deduplication or validation is done. Tables of a different kind
    /// are still appended; callers route by kind before combining.
    pub fn combine(&mut self, other: Self) {
        if other.kind != self.kind {
            tracing::debug!(
                into = %self.kind,
                from = %other.kind,
                "Combining tables of different kinds"
            );
        }
        self.entries.extend(other.entries);
    }
}
