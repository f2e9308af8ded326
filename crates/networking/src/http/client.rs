//! Config document client

use earnin_core::{Error, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL},
    Client, Response, Url,
};
use std::time::Duration;
use tracing::{debug, error, instrument};

const USER_AGENT_VALUE: &str = concat!("earnin/", env!("CARGO_PKG_VERSION"));

/// Default request timeout for config fetches
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches the operators' config document over HTTP.
///
/// The endpoint returns a JSON object holding some or all of the
/// `AppConfig` fields; absent fields keep their local values.
pub struct ConfigClient {
    http: Client,
    url: Url,
}

impl ConfigClient {
    /// Create a client for the given config document URL
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidInput(format!("invalid config url '{}': {}", url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidInput(format!(
                "config url must be http(s), got '{}'",
                url.scheme()
            )));
        }

        let http = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Changes must show up on the next poll
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers
    }

    fn check_status(response: Response) -> Result<Response> {
        response.error_for_status().map_err(|e| {
            error!("Config request failed: {}", e);
            Error::ApiError(e.to_string())
        })
    }

    /// Fetch the raw config document
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_document(&self) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(self.url.clone())
            .headers(Self::default_headers())
            .send()
            .await?;

        debug!("Response status: {}", response.status());
        let response = Self::check_status(response)?;

        let document: serde_json::Value = response.json().await.map_err(|e| {
            error!("Failed to parse config document: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        if !document.is_object() {
            return Err(Error::InvalidData("config document must be an object".to_string()));
        }

        Ok(document)
    }
}
