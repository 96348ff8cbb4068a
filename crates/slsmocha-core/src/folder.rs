//! Test folder management.

use crate::error::Error;
use crate::paths::{Project, TEST_FOLDER};
use std::io;
use std::path::PathBuf;

/// Ensure the project's test folder exists, creating it if absent.
///
/// Only the last path segment is created; the project root must already
/// exist. Returns the folder path relative to the project root, the same
/// value on every call.
///
/// # Errors
/// Returns [`Error::CreateFolder`] if the folder cannot be created.
pub async fn ensure_test_folder(project: &Project) -> Result<PathBuf, Error> {
    let dir = project.test_dir();
    let exists = slsmocha_util::fs::dir_exists(&dir)
        .await
        .map_err(|source| Error::CreateFolder {
            path: dir.clone(),
            source,
        })?;

    if !exists {
        match tokio::fs::create_dir(&dir).await {
            Ok(()) => {}
            // Lost a race with another creator
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
            Err(source) => return Err(Error::CreateFolder { path: dir, source }),
        }
    }

    Ok(PathBuf::from(TEST_FOLDER))
}
