/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public research adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ResearchClient,
    ResearchError,
    ResearchTransport,
    Result,
    UNAVAILABLE_MESSAGE,
};

// Re-export all types
pub use types::*;

pub use reqwest::StatusCode;
