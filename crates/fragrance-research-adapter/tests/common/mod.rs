/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for fragrance-research-adapter tests

use fragrance_research_adapter::{ClientConfig, ResearchClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> ResearchClient {
    ResearchClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Status payload in the shape the research service emits
pub fn status_json(status: &str, progress: u32) -> serde_json::Value {
    serde_json::json!({
        "task_id": "abc123",
        "status": status,
        "progress": progress,
        "message": format!("{status} at {progress}%"),
        "error": null,
    })
}
