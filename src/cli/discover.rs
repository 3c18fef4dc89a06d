use anyhow::{bail, Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Data export extension
pub const DATA_EXTENSION: &str = "csv";
/// Test definition extension
pub const DEFINITION_EXTENSION: &str = "tpr";

/// Files in `dir` with the given extension (case-insensitive), sorted by name.
///
/// With `only`, the named file must exist in `dir` and is the sole result.
pub fn find_files(dir: &Path, extension: &str, only: Option<&str>) -> Result<Vec<PathBuf>> {
    if let Some(name) = only {
        let path = dir.join(name);
        if !path.is_file() {
            bail!("The file '{}' was specified but not found in {}", name, dir.display());
        }
        return Ok(vec![path]);
    }

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    debug!("{}: {} *.{} file(s)", dir.display(), files.len(), extension);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_files_by_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.CSV"), "").unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        fs::write(dir.path().join("Mains.TPR"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let csv = find_files(dir.path(), DATA_EXTENSION, None).unwrap();
        let names: Vec<_> = csv
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.CSV"]);

        assert_eq!(find_files(dir.path(), DEFINITION_EXTENSION, None).unwrap().len(), 1);
    }

    #[test]
    fn test_named_file_must_exist() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();

        assert_eq!(
            find_files(dir.path(), DATA_EXTENSION, Some("a.csv")).unwrap(),
            vec![dir.path().join("a.csv")]
        );
        assert!(find_files(dir.path(), DATA_EXTENSION, Some("missing.csv")).is_err());
    }
}
