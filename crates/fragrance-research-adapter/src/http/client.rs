/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for research API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::http::{ResearchError, Result};
use crate::types::ErrorBody;

/// Default address of the research proxy
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const START_PATH: &str = "/api/research/start";
pub const STATUS_PATH: &str = "/api/research/status";
pub const CANCEL_PATH: &str = "/api/research/cancel";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn build_http_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?)
    }
}

/// Append `path` to the base URL, keeping any path prefix the base carries.
pub fn endpoint_url(base_url: &Url, path: &str) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ResearchError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

/// Build `{base}{prefix}/{task_id}` with the id encoded as one path segment.
pub fn task_url(base_url: &Url, prefix: &str, task_id: &str) -> Result<Url> {
    let mut url = endpoint_url(base_url, prefix)?;
    url.path_segments_mut()
        .map_err(|_| ResearchError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .push(task_id);
    Ok(url)
}

/// Main HTTP client for the research API
#[derive(Debug, Clone)]
pub struct ResearchClient {
    http_client: Client,
    base_url: Url,
}

impl ResearchClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client pointed at an explicit base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            http_client: config.build_http_client()?,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = endpoint_url(&self.base_url, endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    pub(crate) fn task_request(
        &self,
        method: Method,
        prefix: &str,
        task_id: &str,
    ) -> Result<RequestBuilder> {
        let url = task_url(&self.base_url, prefix, task_id)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body, mapping non-2xx to `UpstreamReported`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(response).await);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn upstream_error(response: Response) -> ResearchError {
    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => return err.into(),
    };

    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if text.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("upstream error")
            .to_string(),
        Err(_) => text,
    };

    ResearchError::upstream(status, message)
}
