use crate::domain::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unsupported output format: {name}. Supported: {supported}")]
    UnsupportedFormat { name: String, supported: String },
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl FormatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Serialization(_) => ErrorKind::IoError,
        }
    }
}
