use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot encode progress: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ensure a directory exists; create it (and its parents) if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(_) => fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Replace `target` with `content` through a temp file in the same directory,
/// so readers only ever see the old or the new version.
pub fn write_atomic(target: &Path, content: &str) -> Result<(), PersistError> {
    let dir = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(dir)?;

    let write_error = |source: io::Error| PersistError::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(content.as_bytes()).map_err(write_error)?;
    tmp.flush().map_err(write_error)?;
    tmp.as_file_mut().sync_all().map_err(write_error)?;
    tmp.persist(target).map_err(|err| write_error(err.error))?;
    Ok(())
}
