//! Service settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML), chosen by --config or CONFIG_SERVICE_CONFIG
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → consumed once by startup and the HTTP server
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal or missing settings files
//! - Validation separates syntactic (serde) from semantic checks
//! - Settings describe the service; the configuration tree itself is a
//!   separate document loaded by `loader`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError, CONFIG_PATH_ENV};
pub use schema::{ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig, TreeConfig};
