use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::{DocumentError, LiveDocument};
use crate::parsing::blocks::ScanOptions;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document {path}: {source}")]
    Document {
        path: PathBuf,
        source: DocumentError,
    },
}

/// Read a markdown file into a live document.
pub fn read_document(path: &Path, options: ScanOptions) -> Result<LiveDocument, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    LiveDocument::from_bytes(&bytes, options).map_err(|source| IoError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a document's bytes verbatim, creating parent directories.
pub fn write_document(path: &Path, document: &LiveDocument) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document.to_bytes())?;
    Ok(())
}
