//! Prometheus metrics and structured logging for the Gatekeeper admin client.
//!
//! - Structured logging with tracing (pretty for development, JSON for production)
//! - Prometheus metrics for the log stream and REST calls

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
