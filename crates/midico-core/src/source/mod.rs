use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("input is not a file: {}", path.display())]
    NotAFile { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a whole input file into memory.
pub fn read_input(path: &Path) -> Result<Vec<u8>, SourceError> {
    let meta = fs::metadata(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Io(err),
    })?;
    if !meta.is_file() {
        return Err(SourceError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read(path)?)
}
