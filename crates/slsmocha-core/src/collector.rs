//! Collects the test files handed to the runner.

use crate::error::Error;
use crate::paths::{is_test_file, resolve_test_path, Project, TEST_FOLDER};
use std::path::{Path, PathBuf};

/// Resolve the test files to run, relative to the project root.
///
/// With function names, each is mapped to its test path in input order.
/// Missing files are not detected here; the runner reports them.
///
/// Without names, every `.js` entry directly inside the test folder is
/// returned in directory listing order, which is platform dependent.
///
/// # Errors
/// Returns [`Error::ListFolder`] if the test folder cannot be listed.
pub async fn collect_paths(
    project: &Project,
    function_names: &[String],
) -> Result<Vec<PathBuf>, Error> {
    if !function_names.is_empty() {
        return Ok(function_names
            .iter()
            .map(|name| resolve_test_path(name))
            .collect());
    }

    let dir = project.test_dir();
    let list_err = |source| Error::ListFolder {
        path: dir.clone(),
        source,
    };

    let mut entries = tokio::fs::read_dir(&dir).await.map_err(list_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let file_name = entry.file_name();
        if is_test_file(&file_name) {
            paths.push(Path::new(TEST_FOLDER).join(file_name));
        }
    }

    Ok(paths)
}
