use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Corpus file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid corpus path: {0}")]
    InvalidCorpusPath(String),
}

/// Read the corpus text file
pub fn read_corpus(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

pub fn validate_corpus_path(path: &Path) -> Result<(), IoError> {
    if !path.exists() {
        return Err(IoError::InvalidCorpusPath("File does not exist".to_string()));
    }
    if !path.is_file() {
        return Err(IoError::InvalidCorpusPath("Not a regular file".to_string()));
    }

    Ok(())
}
