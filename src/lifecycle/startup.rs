//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the configuration tree named by the settings
//! - Fall back to an empty tree when loading fails (degraded mode)
//! - Publish the result as the immutable state the HTTP layer serves
//!
//! # Design Decisions
//! - A failed load is not fatal: the service starts, answers `/status`
//!   with 503 and serves an empty tree until restarted with a fix
//! - The tree is loaded once; nothing is reloaded at runtime

use chrono::{DateTime, Utc};

use crate::config::ServiceConfig;
use crate::loader::{LoadError, TreeLoader};
use crate::observability::metrics;
use crate::tree::Tree;

/// Everything the service publishes after startup.
#[derive(Debug)]
pub struct ServiceState {
    tree: Tree,
    uri: String,
    error: Option<String>,
    started_at: DateTime<Utc>,
}

impl ServiceState {
    /// State for a successfully loaded tree.
    pub fn loaded(tree: Tree, uri: impl Into<String>) -> Self {
        Self {
            tree,
            uri: uri.into(),
            error: None,
            started_at: Utc::now(),
        }
    }

    /// State for a failed load: an empty root tree plus the reason.
    pub fn degraded(uri: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tree: Tree::empty(),
            uri: uri.into(),
            error: Some(error.into()),
            started_at: Utc::now(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Location the tree was (or should have been) loaded from.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// False when running degraded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Load the configured tree, degrading instead of failing.
pub async fn bootstrap(config: &ServiceConfig) -> ServiceState {
    let uri = config.tree.uri.clone();
    let state = match load(config).await {
        Ok(tree) => ServiceState::loaded(tree, uri),
        Err(e) => {
            tracing::error!(uri = %uri, error = %e, "Configuration load failed, serving an empty tree");
            ServiceState::degraded(uri, e.to_string())
        }
    };
    metrics::record_tree_size(state.tree().len());
    state
}

async fn load(config: &ServiceConfig) -> Result<Tree, LoadError> {
    TreeLoader::new(config.timeouts.fetch())?
        .load(&config.tree.uri)
        .await
}
