use std::fs;
use std::io;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write bytes to a file that must not exist yet.
///
/// The file is opened with `create_new`, so the existence check and the
/// creation are one filesystem operation. If `path` already exists the
/// returned error has kind [`io::ErrorKind::AlreadyExists`] and the existing
/// file is left untouched.
///
/// If writing fails after the file was created, the partial file is removed
/// so a later call can create it again.
///
/// # Errors
/// Returns an error if the file exists or cannot be created or written.
pub async fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    let written = write_synced(file, bytes).await;
    remove_on_error(path, written).await
}

async fn write_synced(mut file: tokio::fs::File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Delete `path` if `written` failed, returning the write error.
async fn remove_on_error(path: &Path, written: io::Result<()>) -> io::Result<()> {
    if let Err(e) = written {
        // Best effort; the write error is returned either way
        let _ = tokio::fs::remove_file(path).await;
        return Err(e);
    }
    Ok(())
}

/// Check whether `path` exists as a directory.
///
/// A path that exists but is a regular file yields `false`.
///
/// # Errors
/// Returns an error if the metadata lookup fails for a reason other than
/// the path not existing.
pub async fn dir_exists(path: &Path) -> io::Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
