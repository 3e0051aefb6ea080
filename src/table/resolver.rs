//! Turns sub-library declarations into library table rows.
//!
//! `AUTO` declarations scan the sub-library directory and build one row per
//! library found. All other declarations copy the `(lib ...)` rows of an
//! existing table file.
//!
//! Nothing here fails a run: unreadable sources are logged and contribute
//! no rows.

use std::io;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};

use super::{LibKind, LibTable, PROJECT_PATH_VAR};
use crate::config::{SubLibrary, TableSource};

/// Prefix of a data row in a library table file.
pub const LIB_ROW_PREFIX: &str = "(lib ";

/// Resolves one declaration into a table of its kind.
///
/// Directory scans look at `sublib.path` under `working_dir`. Table files
/// are resolved against `config_dir` unless absolute. Missing or unreadable
/// sources log a warning and yield an empty table.
#[must_use]
pub fn resolve(sublib: &SubLibrary, config_dir: &Path, working_dir: &Path) -> LibTable {
    let path = sublib.path.as_deref();
    let entries = match (&sublib.table, path) {
        (TableSource::Auto, Some(path)) => scan_directory(sublib.kind, path, working_dir),
        (TableSource::Auto, None) => {
            warn!(kind = %sublib.kind, "AUTO sub-library has no path, skipping");
            Vec::new()
        }
        (TableSource::File(table), _) => {
            let mut entries = read_table_file(&config_dir.join(table));
            match (&sublib.path_var, path) {
                (Some(var), Some(path)) => substitute_path_var(&mut entries, var, path),
                (Some(var), None) => {
                    warn!(var = %var, "pathvar without path, rows left unchanged");
                }
                (None, _) => {}
            }
            entries
        }
    };

    debug!(
        kind = %sublib.kind,
        path = path.unwrap_or_default(),
        entries = entries.len(),
        "Resolved sub-library"
    );

    LibTable::with_entries(sublib.kind, entries)
}

/// Builds a row for every library of `kind` directly inside `source`.
///
/// Symbol libraries are `.lib` files, footprint libraries are `.pretty`
/// directories. Rows point at `${KIPRJMOD}/<source>/<file>`.
#[must_use]
pub fn scan_directory(kind: LibKind, source: &str, working_dir: &Path) -> Vec<String> {
    let dir: PathBuf = working_dir.join(source).components().collect();
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        kind.scan_extension()
    );

    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Invalid scan pattern, skipping");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();

    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable scan entry");
                continue;
            }
        };

        let is_library = match kind {
            LibKind::Symbol => path.is_file(),
            LibKind::Footprint => path.is_dir(),
        };
        if !is_library {
            continue;
        }

        let (Some(stem), Some(file_name)) = (path.file_stem(), path.file_name()) else {
            continue;
        };

        entries.push(scanned_entry(
            kind,
            &stem.to_string_lossy(),
            &project_uri(source, &file_name.to_string_lossy()),
        ));
    }

    entries
}

/// Joins `parts` under `${KIPRJMOD}`, dropping `.` and root components.
///
/// `project_uri("./libs/", "a.lib")` is `${KIPRJMOD}/libs/a.lib`.
#[must_use]
pub fn project_uri(source: &str, file_name: &str) -> String {
    let mut uri = String::from(PROJECT_PATH_VAR);
    for component in Path::new(source).components() {
        match component {
            Component::Normal(part) => {
                uri.push('/');
                uri.push_str(&part.to_string_lossy());
            }
            Component::ParentDir => uri.push_str("/.."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    if !file_name.is_empty() {
        uri.push('/');
        uri.push_str(file_name);
    }
    uri
}

/// Formats a row for a scanned library.
#[must_use]
pub fn scanned_entry(kind: LibKind, name: &str, uri: &str) -> String {
    format!(
        "  (lib (name {name})(type {})(uri {uri})(options \"\")(descr \"\"))",
        kind.scanned_lib_type()
    )
}

/// Reads the `(lib ...)` rows of a table file, verbatim.
///
/// Invalid UTF-8 is replaced rather than rejected. A missing or unreadable
/// file is logged and treated as empty.
#[must_use]
pub fn read_table_file(path: &Path) -> Vec<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Table file not found, skipping");
            return Vec::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Table file unreadable, skipping");
            return Vec::new();
        }
    };

    let contents = String::from_utf8_lossy(&bytes);
    lib_rows(&contents).map(str::to_string).collect()
}

/// Returns the lines of `contents` that are `(lib ...)` rows.
pub fn lib_rows(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .filter(|line| line.trim_start().starts_with(LIB_ROW_PREFIX))
}

/// Replaces every `${var}` with `${KIPRJMOD}/<source>` in each row.
pub fn substitute_path_var(entries: &mut [String], var: &str, source: &str) {
    let token = format!("${{{var}}}");
    let replacement = project_uri(source, "");
    for entry in entries.iter_mut() {
        if entry.contains(&token) {
            *entry = entry.replace(&token, &replacement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lib_rows_filters_structure() {
        let text = "(sym_lib_table\n  (lib (name a)(type Legacy)(uri x)(options \"\")(descr \"\"))\n# note\n\n(lib (name b))\n  (libx)\n)\n";
        let rows: Vec<&str> = lib_rows(text).collect();
        assert_eq!(
            rows,
            [
                "  (lib (name a)(type Legacy)(uri x)(options \"\")(descr \"\"))",
                "(lib (name b))"
            ]
        );
    }

    #[test]
    fn substitute_replaces_every_occurrence() {
        let mut entries = vec![
            "(lib (name a)(uri ${FOO}/a.pretty)(descr \"${FOO}\"))".to_string(),
            "(lib (name b)(uri ${BAR}/b.pretty))".to_string(),
        ];
        substitute_path_var(&mut entries, "FOO", "sub/dir");
        assert_eq!(
            entries[0],
            "(lib (name a)(uri ${KIPRJMOD}/sub/dir/a.pretty)(descr \"${KIPRJMOD}/sub/dir\"))"
        );
        assert_eq!(entries[1], "(lib (name b)(uri ${BAR}/b.pretty))");
    }

    #[test]
    fn scanned_entry_template() {
        assert_eq!(
            scanned_entry(LibKind::Footprint, "b", "${KIPRJMOD}/libs/b.pretty"),
            "  (lib (name b)(type KiCad)(uri ${KIPRJMOD}/libs/b.pretty)(options \"\")(descr \"\"))"
        );
    }

    #[test]
    fn project_uri_normalises_source() {
        assert_eq!(project_uri("libs/fp", "a.lib"), "${KIPRJMOD}/libs/fp/a.lib");
        assert_eq!(project_uri(".", "a.lib"), "${KIPRJMOD}/a.lib");
        assert_eq!(project_uri("./libs/", "a.lib"), "${KIPRJMOD}/libs/a.lib");
        assert_eq!(project_uri("/abs/libs", "a.lib"), "${KIPRJMOD}/abs/libs/a.lib");
        assert_eq!(project_uri("../shared", "b.pretty"), "${KIPRJMOD}/../shared/b.pretty");
        assert_eq!(project_uri("sub/dir", ""), "${KIPRJMOD}/sub/dir");
    }

    #[test]
    fn missing_table_file_is_empty() {
        let entries = read_table_file(Path::new("/definitely/not/here/sym-lib-table"));
        assert!(entries.is_empty());
    }

    #[test]
    fn invalid_utf8_rows_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fp-lib-table");
        let mut bytes = b"(fp_lib_table\n  (lib (name L)(type KiCad)(uri u)(options \"\")(descr \"L".to_vec();
        bytes.push(0xE4);
        bytes.extend_from_slice(b"nge\"))\n)\n");
        std::fs::write(&path, bytes).unwrap();

        let entries = read_table_file(&path);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("  (lib (name L)"));
        assert!(entries[0].contains('\u{FFFD}'));
    }

    #[test]
    fn unreadable_table_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_table_file(dir.path()).is_empty());
    }
}
