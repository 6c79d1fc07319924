use std::io;

use crate::domain::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io(_) => ErrorKind::IoError,
        }
    }
}
