//! Utility modules for error handling, configuration and logging

pub mod config;
pub mod error;
pub mod logging;
pub mod network;

// Re-export for convenience
pub use config::AppSettings;
pub use error::ServiceError;
pub use logging::init_logging;
