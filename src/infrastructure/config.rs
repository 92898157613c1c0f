use crate::infrastructure::error::ClientError;
use url::Url;

pub const API_BASE_URL_ENV: &str = "HOMETASK_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
}

impl GatewayConfig {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|error| ClientError::InvalidData(format!("invalid base url: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidData(
                "base url cannot be a base".to_string(),
            ));
        }
        Ok(Self { base_url })
    }

    /// Reads `HOMETASK_API_BASE_URL`, falling back to the local development
    /// server.
    pub fn from_env() -> Result<Self, ClientError> {
        let raw = std::env::var(API_BASE_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self::new(&raw)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base url is valid"),
        }
    }
}
