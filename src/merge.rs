//! The merge pipeline: config, resolve, accumulate, write.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{self, Config};
use crate::error::MergeError;
use crate::table::{self, LibKind, LibTable};

/// Inputs for one merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Configuration file to read.
    pub config_path: PathBuf,
    /// Directory `AUTO` sub-library paths are scanned from.
    pub working_dir: PathBuf,
    /// Directory the merged tables are written to.
    pub output_dir: PathBuf,
}

impl MergeOptions {
    /// Options that scan from and write to `dir`.
    #[must_use]
    pub fn in_dir(config_path: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config_path: config_path.into(),
            working_dir: dir.clone(),
            output_dir: dir,
        }
    }
}

/// Per-kind outcome of a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Table kind.
    pub kind: LibKind,
    /// Number of declarations of this kind.
    pub sublibs: usize,
    /// Number of rows written.
    pub entries: usize,
    /// Written file.
    pub path: PathBuf,
}

/// Outcome of a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Symbol table outcome.
    pub symbol: TableSummary,
    /// Footprint table outcome.
    pub footprint: TableSummary,
}

/// Symbol and footprint accumulators for one run.
#[derive(Debug, Clone)]
pub struct MergedTables {
    /// Accumulated symbol rows.
    pub symbol: LibTable,
    /// Accumulated footprint rows.
    pub footprint: LibTable,
}

impl MergedTables {
    /// Creates two empty accumulators.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            symbol: LibTable::new(LibKind::Symbol),
            footprint: LibTable::new(LibKind::Footprint),
        }
    }

    /// Returns the accumulator for `kind`.
    pub fn get_mut(&mut self, kind: LibKind) -> &mut LibTable {
        match kind {
            LibKind::Symbol => &mut self.symbol,
            LibKind::Footprint => &mut self.footprint,
        }
    }

    /// Appends a resolved table to the accumulator of its kind.
    pub fn add(&mut self, table: LibTable) {
        self.get_mut(table.kind()).combine(table);
    }
}

impl Default for MergedTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves every declaration of `config`, in order.
#[must_use]
pub fn collect(config: &Config, working_dir: &Path) -> MergedTables {
    let mut tables = MergedTables::new();
    for sublib in &config.sublibs {
        tables.add(table::resolve(sublib, config.dir(), working_dir));
    }
    tables
}

/// Runs a full merge and writes `sym-lib-table` and `fp-lib-table`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or an output file
/// cannot be written.
pub fn merge(options: &MergeOptions) -> Result<MergeSummary, MergeError> {
    let config = config::load_config(&options.config_path)?;
    info!(
        config = %config.path.display(),
        sublibs = config.sublibs.len(),
        "Merging sub-libraries"
    );

    let tables = collect(&config, &options.working_dir);
    let count = |kind: LibKind| config.sublibs.iter().filter(|s| s.kind == kind).count();

    let write = |table: &LibTable| -> Result<TableSummary, MergeError> {
        let path = options.output_dir.join(table.kind().table_file_name());
        table::write_table(table, &path)?;
        Ok(TableSummary {
            kind: table.kind(),
            sublibs: count(table.kind()),
            entries: table.len(),
            path,
        })
    };

    Ok(MergeSummary {
        symbol: write(&tables.symbol)?,
        footprint: write(&tables.footprint)?,
    })
}
