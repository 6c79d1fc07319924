use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::file_type::FileType;

pub type Metadata = Map<String, Value>;

/// Descriptor handed to a loader alongside the raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub filename: String,
    pub file_type: FileType,
    pub size_bytes: u64,
}

impl Document {
    pub fn new(filename: impl Into<String>, file_type: FileType, size_bytes: u64) -> Self {
        Self {
            filename: filename.into(),
            file_type,
            size_bytes,
        }
    }
}

/// Normalized text and structural metadata produced by the extraction engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub content: String,
    pub metadata: Metadata,
    pub file_name: String,
    pub size_bytes: u64,
    pub file_type: FileType,
    pub processed_at: DateTime<Utc>,
}

impl ExtractedDocument {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Records the outcome of a generation call next to the extraction metadata.
    pub fn attach_generation(&mut self, result: impl Into<String>, prompt: impl Into<String>) {
        self.metadata
            .insert("generation_result".to_string(), Value::String(result.into()));
        self.metadata
            .insert("prompt_used".to_string(), Value::String(prompt.into()));
    }
}
