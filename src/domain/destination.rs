use std::fmt;
use std::path::PathBuf;

/// Storage backends the destination sink can persist to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    Local,
    NetworkPath,
    S3,
    Azure,
}

impl DestinationKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "network_path" => Some(Self::NetworkPath),
            "s3" => Some(Self::S3),
            "azure" => Some(Self::Azure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::NetworkPath => "network_path",
            Self::S3 => "s3",
            Self::Azure => "azure",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a single save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationParams {
    pub directory: Option<PathBuf>,
    pub bucket: Option<String>,
    pub object_key: Option<String>,
    pub container: Option<String>,
    pub blob_name: Option<String>,
}

impl DestinationParams {
    pub fn directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    pub fn s3(bucket: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            object_key: Some(object_key.into()),
            ..Self::default()
        }
    }

    pub fn azure(container: impl Into<String>, blob_name: impl Into<String>) -> Self {
        Self {
            container: Some(container.into()),
            blob_name: Some(blob_name.into()),
            ..Self::default()
        }
    }
}

/// Shared destination configuration for a batch save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDestination {
    pub directory: Option<PathBuf>,
    pub bucket: Option<String>,
    pub container: Option<String>,
    pub prefix: Option<String>,
}

impl BatchDestination {
    /// Object key or blob name for `file_name`, honouring the shared prefix.
    pub fn object_name(&self, file_name: &str) -> String {
        match self.prefix.as_deref().filter(|p| !p.is_empty()) {
            Some(prefix) => format!("{prefix}/{file_name}"),
            None => file_name.to_string(),
        }
    }
}
