//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loader, lifecycle, http handlers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Query client errors are debug events, never errors

pub mod logging;
pub mod metrics;

use thiserror::Error;

pub use self::logging::init_logging;
pub use self::metrics::init_metrics;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("cannot install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("cannot install metrics exporter: {0}")]
    Metrics(String),
}
