/*
[INPUT]:  Start bodies and task ids from HTTP handlers
[OUTPUT]: Upstream status/body relayed verbatim, or a ProxyError
[POS]:    Forwarding layer - stateless TaskProxy over the research service
[UPDATE]: When forwarded endpoints or connectivity mapping change
*/

use axum::{
    body::Bytes,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use fragrance_research_adapter::http::client::{CANCEL_PATH, START_PATH, STATUS_PATH};
use fragrance_research_adapter::http::{endpoint_url, task_url};
use fragrance_research_adapter::{ClientConfig, StartResearchRequest};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ProxyError;

/// Upstream response captured without interpretation.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Stateless forwarder to the research service.
#[derive(Debug, Clone)]
pub struct TaskProxy {
    http_client: Client,
    upstream: Url,
}

impl TaskProxy {
    pub fn new(upstream: Url, config: &ClientConfig) -> fragrance_research_adapter::Result<Self> {
        Ok(Self {
            http_client: config.build_http_client()?,
            upstream,
        })
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// POST /api/research/start
    ///
    /// Rejects a bad body locally; otherwise forwards `{notes, preferences}`.
    pub async fn start(&self, body: &Value) -> Result<Forwarded, ProxyError> {
        let request = StartResearchRequest::from_value(body)?;
        let url = endpoint_url(&self.upstream, START_PATH)?;
        debug!(notes = request.notes().len(), "forwarding start");
        self.forward("start", self.http_client.post(url).json(&request))
            .await
    }

    /// GET /api/research/status/{task_id}
    pub async fn status(&self, task_id: &str) -> Result<Forwarded, ProxyError> {
        let url = task_url(&self.upstream, STATUS_PATH, task_id)?;
        self.forward("status", self.http_client.get(url)).await
    }

    /// POST /api/research/cancel/{task_id}
    pub async fn cancel(&self, task_id: &str) -> Result<Forwarded, ProxyError> {
        let url = task_url(&self.upstream, CANCEL_PATH, task_id)?;
        debug!(task_id, "forwarding cancel");
        self.forward("cancel", self.http_client.post(url)).await
    }

    async fn forward(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<Forwarded, ProxyError> {
        let response = builder
            .send()
            .await
            .map_err(|err| unavailable(operation, err))?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|err| unavailable(operation, err))?;

        debug!(operation, status = status.as_u16(), "upstream responded");
        Ok(Forwarded {
            status,
            content_type,
            body,
        })
    }
}

fn unavailable(operation: &'static str, source: reqwest::Error) -> ProxyError {
    warn!(operation, error = %source, "research service unavailable");
    ProxyError::Unavailable { operation, source }
}
