//! Error types for kicad-libtable-merge.
//!
//! Only conditions that abort a run live here. Malformed config lines and
//! missing or unreadable sub-library sources are absorbed where they are
//! detected.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Explicitly given configuration file does not exist.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// No configuration file was found by the fallback search.
    #[error("no sub-lib-config found in {} searched directories", .searched.len())]
    NoConfigFound {
        /// Directories that were searched, in search order.
        searched: Vec<PathBuf>,
    },
}

/// Result type for library table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while writing library tables.
#[derive(Error, Debug)]
pub enum TableError {
    /// Failed to write an output table file.
    #[error("failed to write table file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl TableError {
    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}

/// Top-level error for a merge run.
#[derive(Error, Debug)]
pub enum MergeError {
    /// Configuration could not be located or read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A library table could not be written.
    #[error(transparent)]
    Table(#[from] TableError),
}
