//! kicad-libtable-merge: merge sub-project KiCad library tables
//!
//! Reads a `sub-lib-config` file listing sub-libraries and produces one
//! `sym-lib-table` and one `fp-lib-table` for the parent project.
//!
//! # Architecture
//!
//! The merge is a single pass:
//!
//! - **Config**: parse `(sublib ...)` lines, skipping anything malformed
//! - **Resolve**: scan a directory (`AUTO`) or copy rows from an existing
//!   table, re-rooting a sub-project path variable under `${KIPRJMOD}`
//! - **Accumulate**: append rows per kind, in config order
//! - **Write**: emit both tables with their header and closing token
//!
//! # Modules
//!
//! - [`config`] — Configuration location and parsing
//! - [`error`] — Error types
//! - [`merge`] — The merge pipeline
//! - [`table`] — Library tables, resolution and serialisation

pub mod config;
pub mod error;
pub mod merge;
pub mod table;

pub use merge::{merge, MergeOptions, MergeSummary};
