//! SpaceX launch query client
//!
//! This module provides the `LaunchFetcher` boundary consumed by the
//! aggregator and the reqwest-backed `LaunchClient` that implements it
//! against the `launches/query` endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::{LaunchDocs, LaunchError, LaunchPage, LaunchRecord, DEFAULT_BASE_URL};

/// Path of the paginated query endpoint, relative to the API root
const LAUNCH_QUERY_PATH: &str = "launches/query";

/// Performs one paginated remote fetch
///
/// Implementations hold no pagination state; callers pass the page number
/// on every call.
#[async_trait]
pub trait LaunchFetcher: Send + Sync {
    /// Fetches page `page` (numbered from 1)
    async fn fetch_page(&self, page: u32) -> Result<LaunchPage, LaunchError>;
}

/// Request body for `launches/query`
#[derive(Debug, Serialize)]
struct QueryRequest {
    options: QueryOptions,
}

#[derive(Debug, Serialize)]
struct QueryOptions {
    page: u32,
}

/// Client for fetching launch pages from the SpaceX API
#[derive(Debug, Clone)]
pub struct LaunchClient {
    client: Client,
    base_url: String,
}

impl Default for LaunchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchClient {
    /// Create a new LaunchClient against the public API
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a new LaunchClient with a custom HTTP client and API root
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Resolves the query endpoint against the configured API root
    fn query_url(&self) -> Result<Url, LaunchError> {
        endpoint_url(&self.base_url, LAUNCH_QUERY_PATH)
    }
}

#[async_trait]
impl LaunchFetcher for LaunchClient {
    async fn fetch_page(&self, page: u32) -> Result<LaunchPage, LaunchError> {
        let url = self.query_url()?;
        debug!(%url, page, "requesting launch page");

        let body = QueryRequest {
            options: QueryOptions { page },
        };

        let response = self.client.post(url).json(&body).send().await?;
        if response.status() != StatusCode::OK {
            return Err(LaunchError::status(response.status().as_u16()));
        }

        let text = response.text().await?;
        decode_page(&text)
    }
}

/// Joins a relative endpoint path onto an API root, tolerating a missing
/// trailing slash on the root
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url, LaunchError> {
    let mut root = base_url.to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    Url::parse(&root)
        .and_then(|root| root.join(path))
        .map_err(|e| LaunchError::InvalidRequestTarget(format!("{base_url}: {e}")))
}

/// Decodes a `launches/query` response body into a page
fn decode_page(text: &str) -> Result<LaunchPage, LaunchError> {
    if text.trim().is_empty() {
        return Err(LaunchError::InvalidPayload("empty response body".to_string()));
    }
    let docs: LaunchDocs = serde_json::from_str(text)?;
    Ok(docs.docs.into_iter().map(LaunchRecord::into_launch).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trimmed response from `launches/query` with two docs
    const VALID_RESPONSE: &str = r#"{
        "docs": [
            {
                "fairings": null,
                "links": {
                    "patch": { "small": "https://images2.imgbox.com/3c/0e/T8iJcSN3_o.png", "large": null },
                    "wikipedia": "https://en.wikipedia.org/wiki/DemoSat"
                },
                "rocket": "5e9d0d95eda69955f709d1eb",
                "success": false,
                "name": "FalconSat",
                "date_utc": "2006-03-24T22:30:00.000Z",
                "date_unix": 1143239400,
                "id": "5eb87cd9ffd86e000604b32a"
            },
            {
                "links": { "patch": { "small": null }, "wikipedia": null },
                "rocket": "5e9d0d95eda69955f709d1eb",
                "success": true,
                "name": "RatSat",
                "date_utc": "2008-09-28T23:15:00.000Z",
                "date_unix": 1222643700,
                "id": "5eb87cdbffd86e000604b32d"
            }
        ],
        "totalDocs": 205,
        "limit": 10,
        "page": 1,
        "hasNextPage": true,
        "nextPage": 2
    }"#;

    #[test]
    fn test_decode_page_preserves_upstream_order() {
        let page = decode_page(VALID_RESPONSE).expect("valid response should decode");

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "FalconSat");
        assert_eq!(page[1].name, "RatSat");
        assert_eq!(page[1].success, Some(true));
        assert!(page[1].patch_image_url.is_none());
    }

    #[test]
    fn test_decode_page_empty_body_is_invalid_payload() {
        let result = decode_page("   ");
        assert!(matches!(result, Err(LaunchError::InvalidPayload(_))));
    }

    #[test]
    fn test_decode_page_missing_docs_is_invalid_payload() {
        let result = decode_page(r#"{"totalDocs": 0}"#);
        assert!(matches!(result, Err(LaunchError::InvalidPayload(_))));
    }

    #[test]
    fn test_decode_page_empty_docs_is_empty_page() {
        let page = decode_page(r#"{"docs": []}"#).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_query_body_shape() {
        let body = QueryRequest {
            options: QueryOptions { page: 3 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "options": { "page": 3 } }));
    }

    #[test]
    fn test_endpoint_url_with_and_without_trailing_slash() {
        let with_slash = endpoint_url("https://api.spacexdata.com/v4/", LAUNCH_QUERY_PATH).unwrap();
        let without = endpoint_url("https://api.spacexdata.com/v4", LAUNCH_QUERY_PATH).unwrap();

        assert_eq!(
            with_slash.as_str(),
            "https://api.spacexdata.com/v4/launches/query"
        );
        assert_eq!(with_slash, without);
    }

    #[test]
    fn test_endpoint_url_rejects_garbage() {
        let result = endpoint_url("not a url", LAUNCH_QUERY_PATH);
        assert!(matches!(result, Err(LaunchError::InvalidRequestTarget(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_with_bad_base_url_fails_before_network() {
        let client = LaunchClient::with_client(Client::new(), "::nope::");
        let result = client.fetch_page(1).await;
        assert!(matches!(result, Err(LaunchError::InvalidRequestTarget(_))));
    }
}
