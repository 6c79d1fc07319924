use std::fmt;

/// Failure categories surfaced to callers regardless of which component failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UnsupportedFormat,
    UnsupportedProvider,
    MissingCredentials,
    DecodeError,
    ProviderError,
    IoError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::NotFound => "NotFound",
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::UnsupportedProvider => "UnsupportedProvider",
            Self::MissingCredentials => "MissingCredentials",
            Self::DecodeError => "DecodeError",
            Self::ProviderError => "ProviderError",
            Self::IoError => "IOError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
