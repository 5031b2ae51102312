//! HTTP surface of the configuration service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID / trace / timeout layers)
//!     → params.rs (query string → lookup or per-level term lists)
//!     → handlers.rs (find_node or Matcher over the shared tree)
//!     → response.rs (status mapping, ETag / Last-Modified, 304)
//!     → Send to client
//! ```

pub mod handlers;
pub mod params;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
