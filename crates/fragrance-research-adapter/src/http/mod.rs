/*
[INPUT]:  HTTP client configuration and research API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod research;
pub mod transport;

pub use error::{ResearchError, Result, UNAVAILABLE_MESSAGE};
pub use transport::ResearchTransport;

pub use client::{ClientConfig, DEFAULT_BASE_URL, ResearchClient, endpoint_url, task_url};
