//! Configuration Store: durable keyed storage for endpoints, global settings
//! and request logs.
//!
//! The store is the only writer of persisted state. Everything else receives
//! plain values and never holds on to stored records.
//!
//! ## Module Structure
//!
//! - `filter`: log filtering and pagination shared by all backends
//! - `memory`: in-process backend (tests, ephemeral runs)
//! - `file`: JSON-file backend, one file per collection

mod file;
mod filter;
mod memory;

pub use file::FileStore;
pub use filter::{LogFilter, LogPage};
pub use memory::InMemoryStore;

use crate::config::StorageConfig;
use crate::model::{ConfigExport, EndpointConfig, GlobalConfig, RequestLog};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Maximum number of request logs retained; older entries are evicted on insert
pub const MAX_RETAINED_LOGS: usize = 1000;

/// Store-level failure. Reads of missing collections are not errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Backend-agnostic storage contract.
///
/// Every operation is atomic at the granularity of one collection: a reader
/// never observes a partially written collection.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Global settings, or the defaults when none were saved yet
    async fn get_global_config(&self) -> Result<GlobalConfig, StoreError>;

    async fn save_global_config(&self, config: &GlobalConfig) -> Result<(), StoreError>;

    /// All endpoints in insertion order
    async fn list_endpoints(&self) -> Result<Vec<EndpointConfig>, StoreError>;

    async fn get_endpoint(&self, id: &str) -> Result<Option<EndpointConfig>, StoreError>;

    /// Upsert by id; an existing record is replaced wholesale
    async fn save_endpoint(&self, endpoint: EndpointConfig) -> Result<(), StoreError>;

    /// Returns whether a record was removed
    async fn delete_endpoint(&self, id: &str) -> Result<bool, StoreError>;

    /// Insert at the head (newest first), then keep the newest [`MAX_RETAINED_LOGS`]
    async fn add_log(&self, log: RequestLog) -> Result<(), StoreError>;

    /// Filter with AND semantics, then paginate. `total` counts matches before paging.
    async fn query_logs(&self, filter: &LogFilter) -> Result<LogPage, StoreError>;

    async fn get_log(&self, id: &str) -> Result<Option<RequestLog>, StoreError>;

    /// Remove logs matching ANY provided predicate. A filter without
    /// predicates clears everything. Returns the number of removed logs.
    async fn delete_logs(&self, filter: &LogFilter) -> Result<usize, StoreError>;

    async fn clear_logs(&self) -> Result<(), StoreError>;

    /// Snapshot of the global settings and every endpoint
    async fn export(&self) -> Result<ConfigExport, StoreError> {
        let global_config = self.get_global_config().await?;
        let endpoints = self.list_endpoints().await?;
        Ok(ConfigExport::new(global_config, endpoints))
    }
}

/// Create the store selected by configuration
pub fn create_store(config: &StorageConfig) -> Arc<dyn ConfigStore> {
    match config {
        StorageConfig::Memory => {
            tracing::info!("Using in-memory store (state is lost on exit)");
            Arc::new(InMemoryStore::new())
        }
        StorageConfig::File { data_dir } => {
            tracing::info!("Using file store (data_dir={})", data_dir.display());
            Arc::new(FileStore::new(data_dir.clone()))
        }
    }
}
