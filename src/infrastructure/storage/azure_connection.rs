use crate::application::ports::StorageError;

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
const EMULATOR_ACCOUNT: &str = "devstoreaccount1";
const EMULATOR_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const EMULATOR_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Parsed `Key=Value;` storage account connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureConnectionString {
    pub account_name: String,
    pub account_key: String,
    pub protocol: String,
    pub endpoint_suffix: String,
    pub blob_endpoint: Option<String>,
}

impl AzureConnectionString {
    pub fn parse(connection_string: &str) -> Result<Self, StorageError> {
        let mut account_name = None;
        let mut account_key = None;
        let mut protocol = None;
        let mut endpoint_suffix = None;
        let mut blob_endpoint = None;
        let mut use_emulator = false;

        for pair in connection_string.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StorageError::InvalidInput(format!("malformed connection string segment: {pair}"))
            })?;
            let value = value.trim().to_string();
            match key.trim() {
                "AccountName" => account_name = Some(value),
                "AccountKey" => account_key = Some(value),
                "DefaultEndpointsProtocol" => protocol = Some(value),
                "EndpointSuffix" => endpoint_suffix = Some(value),
                "BlobEndpoint" => blob_endpoint = Some(value),
                "UseDevelopmentStorage" => use_emulator = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        if use_emulator {
            return Ok(Self {
                account_name: EMULATOR_ACCOUNT.to_string(),
                account_key: EMULATOR_KEY.to_string(),
                protocol: "http".to_string(),
                endpoint_suffix: DEFAULT_ENDPOINT_SUFFIX.to_string(),
                blob_endpoint: Some(
                    blob_endpoint.unwrap_or_else(|| EMULATOR_BLOB_ENDPOINT.to_string()),
                ),
            });
        }

        Ok(Self {
            account_name: account_name.ok_or_else(|| {
                StorageError::InvalidInput("connection string has no AccountName".to_string())
            })?,
            account_key: account_key.ok_or_else(|| {
                StorageError::InvalidInput("connection string has no AccountKey".to_string())
            })?,
            protocol: protocol.unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
            endpoint_suffix: endpoint_suffix.unwrap_or_else(|| DEFAULT_ENDPOINT_SUFFIX.to_string()),
            blob_endpoint: blob_endpoint.map(|e| e.trim_end_matches('/').to_string()),
        })
    }

    /// Base URL of the blob service, without a trailing slash.
    pub fn blob_service_url(&self) -> String {
        match &self.blob_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "{}://{}.blob.{}",
                self.protocol, self.account_name, self.endpoint_suffix
            ),
        }
    }

    pub fn uses_custom_endpoint(&self) -> bool {
        self.blob_endpoint.is_some()
    }
}
