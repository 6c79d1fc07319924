mod destination;
mod document;
mod error_kind;
mod file_type;
mod generation_request;
mod output_format;
mod persisted_location;
mod provider_kind;
mod raw_file;
mod source;

pub use destination::{BatchDestination, DestinationKind, DestinationParams};
pub use document::{Document, ExtractedDocument, Metadata};
pub use error_kind::ErrorKind;
pub use file_type::{ContentType, FileType, extension_of};
pub use generation_request::GenerationRequest;
pub use output_format::OutputFormat;
pub use persisted_location::PersistedLocation;
pub use provider_kind::ProviderKind;
pub use raw_file::RawFile;
pub use source::{SourceKind, SourceParams};
