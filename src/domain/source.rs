use std::fmt;
use std::path::PathBuf;

/// Origins the source reader can fetch raw bytes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Upload,
    LocalPath,
    NetworkPath,
    S3,
    Azure,
}

impl SourceKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "upload" => Some(Self::Upload),
            "local_path" => Some(Self::LocalPath),
            "network_path" => Some(Self::NetworkPath),
            "s3" => Some(Self::S3),
            "azure" => Some(Self::Azure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::LocalPath => "local_path",
            Self::NetworkPath => "network_path",
            Self::S3 => "s3",
            Self::Azure => "azure",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific source parameters. Which fields are required depends on the
/// [`SourceKind`] they are used with; the reader rejects missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceParams {
    pub content: Option<Vec<u8>>,
    pub file_name: Option<String>,
    pub path: Option<PathBuf>,
    pub bucket: Option<String>,
    pub key: Option<String>,
}

impl SourceParams {
    pub fn upload(content: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            content: Some(content),
            file_name: Some(file_name.into()),
            ..Self::default()
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Bucket and key for S3, or container and blob name for Azure.
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            key: Some(key.into()),
            ..Self::default()
        }
    }
}
