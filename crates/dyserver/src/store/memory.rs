use super::{ConfigStore, LogFilter, LogPage, StoreError, MAX_RETAINED_LOGS};
use crate::model::{EndpointConfig, GlobalConfig, RequestLog};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// In-memory implementation of ConfigStore
///
/// Each collection sits behind its own lock. Nothing survives a restart;
/// useful for testing, development and throwaway mock servers.
#[derive(Default)]
pub struct InMemoryStore {
    global: RwLock<GlobalConfig>,
    /// Insertion order is resolution order
    endpoints: RwLock<Vec<EndpointConfig>>,
    /// Newest first
    logs: RwLock<VecDeque<RequestLog>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate endpoints, preserving their order
    pub fn with_endpoints(endpoints: Vec<EndpointConfig>) -> Self {
        Self {
            endpoints: RwLock::new(endpoints),
            ..Self::default()
        }
    }

    pub fn with_global_config(self, config: GlobalConfig) -> Self {
        *self.global.write() = config;
        self
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn get_global_config(&self) -> Result<GlobalConfig, StoreError> {
        Ok(*self.global.read())
    }

    async fn save_global_config(&self, config: &GlobalConfig) -> Result<(), StoreError> {
        *self.global.write() = *config;
        Ok(())
    }

    async fn list_endpoints(&self) -> Result<Vec<EndpointConfig>, StoreError> {
        Ok(self.endpoints.read().clone())
    }

    async fn get_endpoint(&self, id: &str) -> Result<Option<EndpointConfig>, StoreError> {
        Ok(self.endpoints.read().iter().find(|e| e.id == id).cloned())
    }

    async fn save_endpoint(&self, endpoint: EndpointConfig) -> Result<(), StoreError> {
        let mut endpoints = self.endpoints.write();
        match endpoints.iter_mut().find(|e| e.id == endpoint.id) {
            Some(existing) => *existing = endpoint,
            None => endpoints.push(endpoint),
        }
        Ok(())
    }

    async fn delete_endpoint(&self, id: &str) -> Result<bool, StoreError> {
        let mut endpoints = self.endpoints.write();
        let before = endpoints.len();
        endpoints.retain(|e| e.id != id);
        Ok(endpoints.len() != before)
    }

    async fn add_log(&self, log: RequestLog) -> Result<(), StoreError> {
        let mut logs = self.logs.write();
        logs.push_front(log);
        logs.truncate(MAX_RETAINED_LOGS);
        Ok(())
    }

    async fn query_logs(&self, filter: &LogFilter) -> Result<LogPage, StoreError> {
        Ok(filter.apply(self.logs.read().iter()))
    }

    async fn get_log(&self, id: &str) -> Result<Option<RequestLog>, StoreError> {
        Ok(self.logs.read().iter().find(|l| l.id == id).cloned())
    }

    async fn delete_logs(&self, filter: &LogFilter) -> Result<usize, StoreError> {
        let mut logs = self.logs.write();
        let before = logs.len();
        if filter.has_predicates() {
            logs.retain(|l| !filter.matches_any(l));
        } else {
            logs.clear();
        }
        Ok(before - logs.len())
    }

    async fn clear_logs(&self) -> Result<(), StoreError> {
        self.logs.write().clear();
        Ok(())
    }
}
