use std::fmt;

/// Filesystem path or URI returned by a destination sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLocation(String);

impl PersistedLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PersistedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
