//! Hierarchical configuration tree service library.

pub mod caching;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod loader;
pub mod matching;
pub mod observability;
pub mod tree;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use loader::TreeLoader;
pub use matching::Matcher;
pub use tree::Tree;
