// Library exports for the binary and the integration tests

// Service modules (HTTP server, stores, process management)
pub mod daemon;
// On-disk layout and configuration
pub mod state;
pub mod version;

// Re-export key types for convenience
pub use daemon::http_server;
pub use daemon::spawn_service;
pub use daemon::ServiceConfig;
pub use daemon::ServiceState;
pub use state::{AppConfig, AppState, Environment, StateError};
