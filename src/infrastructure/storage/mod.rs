mod azure_connection;
mod azure_store;
mod memory_store;
mod s3_store;
mod store_factory;

pub use azure_connection::AzureConnectionString;
pub use azure_store::AzureBlobStorage;
pub use memory_store::InMemoryObjectStorage;
pub use s3_store::{S3Credentials, S3ObjectStorage};
pub use store_factory::ObjectStorageFactory;
