//! Configuration file loading and parsing.
//!
//! The configuration is a line-oriented `sub-lib-config` file. Every line
//! that parses as a [`SubLibrary`] declaration is kept, in file order.
//! Everything else is skipped without error.
//!
//! # Configuration File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Path specified via `--config` CLI flag
//! 2. `sub-lib-config` in the working directory, its parent, then its
//!    grandparent

mod sublib;

pub use sublib::{SubLibrary, TableSource, AUTO_TABLE, SUBLIB_PREFIX};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name looked for by the fallback search.
pub const CONFIG_FILE_NAME: &str = "sub-lib-config";

/// Number of directories checked by the fallback search, starting with the
/// working directory.
pub const SEARCH_DEPTH: usize = 3;

/// A loaded configuration file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path the configuration was read from.
    pub path: PathBuf,
    /// Sub-library declarations in file order.
    pub sublibs: Vec<SubLibrary>,
}

impl Config {
    /// Directory relative table paths are resolved against.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Finds the configuration file.
///
/// An explicit path must exist. Otherwise `start` and its ancestors are
/// searched, up to [`SEARCH_DEPTH`] directories.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `explicit` does not exist, or
/// [`ConfigError::NoConfigFound`] if the search finds nothing.
pub fn locate_config(explicit: Option<&Path>, start: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(path.to_path_buf());
    }

    let searched: Vec<PathBuf> = start
        .ancestors()
        .take(SEARCH_DEPTH)
        .map(Path::to_path_buf)
        .collect();

    for dir in &searched {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "Found configuration");
            return Ok(candidate);
        }
    }

    Err(ConfigError::NoConfigFound { searched })
}

/// Parses configuration text into declarations, dropping invalid lines.
///
/// Table paths are kept as written; they are resolved against the config
/// directory when the declaration is resolved.
#[must_use]
pub fn parse_config(contents: &str) -> Vec<SubLibrary> {
    contents.lines().filter_map(SubLibrary::parse_line).collect()
}

/// Loads and parses the configuration file.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let sublibs = parse_config(&contents);
    tracing::debug!(
        path = %path.display(),
        sublibs = sublibs.len(),
        "Loaded configuration"
    );

    Ok(Config {
        path: path.to_path_buf(),
        sublibs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::LibKind;

    #[test]
    fn parse_config_keeps_valid_lines_in_order() {
        let text = "\
# project libraries
(sublib (type fp)(path a)(table AUTO))

(sublib (type bogus)(path b))
  (sublib (type sym)(path c)(pathvar C_DIR))
garbage
(sublib (type sym)(path d)(table AUTO))
";
        let sublibs = parse_config(text);
        let paths: Vec<Option<&str>> = sublibs.iter().map(|s| s.path.as_deref()).collect();
        assert_eq!(paths, [Some("a"), Some("c"), Some("d")]);
        assert_eq!(sublibs[0].kind, LibKind::Footprint);
        assert_eq!(sublibs[1].path_var.as_deref(), Some("C_DIR"));
    }

    #[test]
    fn parse_empty_config() {
        assert!(parse_config("").is_empty());
    }

    #[test]
    fn config_dir_of_bare_file_name_is_empty() {
        let config = Config {
            path: PathBuf::from(CONFIG_FILE_NAME),
            sublibs: Vec::new(),
        };
        assert_eq!(config.dir(), Path::new(""));
    }

    #[test]
    fn explicit_missing_config_is_not_found() {
        let err = locate_config(
            Some(Path::new("/definitely/not/here/sub-lib-config")),
            Path::new("/"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_missing_config_is_not_found() {
        let err = load_config(Path::new("/definitely/not/here/sub-lib-config")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
