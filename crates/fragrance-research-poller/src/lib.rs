/*
[INPUT]:  Public API exports for fragrance-research-poller crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod poller;
pub mod snapshot;

// Re-export main types for convenience
pub use config::PollerConfig;
pub use poller::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, PollerOptions, TaskPoller};
pub use snapshot::{PollerPhase, TaskSnapshot};
