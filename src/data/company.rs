//! SpaceX company info client
//!
//! Company info is decoration for the launch list header. Failures never
//! reach the caller; they are logged and reported as `None`.

use reqwest::{Client, StatusCode};
use tracing::debug;

use super::launches::endpoint_url;
use super::{CompanyInfo, LaunchError, DEFAULT_BASE_URL};

const COMPANY_PATH: &str = "company";

/// Client for the `company` endpoint
#[derive(Debug, Clone)]
pub struct CompanyClient {
    client: Client,
    base_url: String,
}

impl Default for CompanyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyClient {
    /// Create a new CompanyClient against the public API
    pub fn new() -> Self {
        Self::with_client(Client::new(), DEFAULT_BASE_URL)
    }

    /// Create a new CompanyClient with a custom HTTP client and API root
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetches company info, swallowing every failure
    pub async fn fetch_company_info(&self) -> Option<CompanyInfo> {
        match self.try_fetch().await {
            Ok(info) => Some(info),
            Err(err) => {
                debug!(error = %err, "company info unavailable");
                None
            }
        }
    }

    async fn try_fetch(&self) -> Result<CompanyInfo, LaunchError> {
        let url = endpoint_url(&self.base_url, COMPANY_PATH)?;
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(LaunchError::status(response.status().as_u16()));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
