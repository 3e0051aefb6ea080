//! kicad-libtable-merge: merge sub-project KiCad library tables
//!
//! Writes `sym-lib-table` and `fp-lib-table` for the parent project from the
//! sub-libraries listed in `sub-lib-config`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use kicad_libtable_merge::config;
use kicad_libtable_merge::error::ConfigError;
use kicad_libtable_merge::{merge, MergeOptions};

/// Merge sub-project KiCad library tables into the project's tables.
///
/// Without `--config`, `sub-lib-config` is searched in the current
/// directory and its two parents.
#[derive(Parser, Debug)]
#[command(name = "kicad-libtable-merge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the sub-lib-config file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Directory to write sym-lib-table and fp-lib-table to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
const fn get_log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for kicad-libtable-merge.
fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(get_log_level(args.verbose, args.quiet));

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!(error = %e, "Cannot determine current directory");
            return ExitCode::FAILURE;
        }
    };

    let config_path = match config::locate_config(args.config.as_deref(), &working_dir) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if let ConfigError::NoConfigFound { searched } = &e {
                for dir in searched {
                    eprintln!("  searched: {}", dir.join(config::CONFIG_FILE_NAME).display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    let options = MergeOptions {
        config_path,
        working_dir,
        output_dir: args.output_dir,
    };

    match merge(&options) {
        Ok(summary) => {
            for table in [&summary.symbol, &summary.footprint] {
                info!(
                    table = %table.kind,
                    sublibs = table.sublibs,
                    entries = table.entries,
                    path = %table.path.display(),
                    "Merged"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Merge failed");
            ExitCode::FAILURE
        }
    }
}
