use super::{ConfigStore, LogFilter, LogPage, StoreError, MAX_RETAINED_LOGS};
use crate::model::{EndpointConfig, GlobalConfig, RequestLog};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

const ENDPOINTS_FILE: &str = "endpoints.json";
const LOGS_FILE: &str = "logs.json";
const CONFIG_FILE: &str = "config.json";

/// JSON-file implementation of ConfigStore
///
/// Each collection is one pretty-printed JSON document under `data_dir`, read
/// and written wholesale. Writes go to a temporary sibling and are renamed
/// into place, so readers only ever see a complete document. A per-collection
/// mutex is held across read-modify-write cycles.
pub struct FileStore {
    data_dir: PathBuf,
    endpoints_lock: Mutex<()>,
    logs_lock: Mutex<()>,
    config_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            endpoints_lock: Mutex::new(()),
            logs_lock: Mutex::new(()),
            config_lock: Mutex::new(()),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Read a collection; a missing (or blank) file yields the default
    async fn read_json<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.file(name);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} does not exist, using defaults", path);
                return Ok(T::default());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        if contents.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&contents).map_err(|source| StoreError::Serialization { path, source })
    }

    /// Replace a collection atomically (write temp file, then rename)
    async fn write_json<T: Serialize + Sync>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.file(name);
        let json = serde_json::to_string_pretty(value).map_err(|source| {
            StoreError::Serialization {
                path: path.clone(),
                source,
            }
        })?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.data_dir.clone(),
                source,
            })?;

        let tmp_path = self.file(&format!("{name}.tmp"));
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| StoreError::Io { path, source })
    }

    async fn read_endpoints(&self) -> Result<Vec<EndpointConfig>, StoreError> {
        self.read_json(ENDPOINTS_FILE).await
    }

    async fn read_logs(&self) -> Result<Vec<RequestLog>, StoreError> {
        self.read_json(LOGS_FILE).await
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn get_global_config(&self) -> Result<GlobalConfig, StoreError> {
        self.read_json(CONFIG_FILE).await
    }

    async fn save_global_config(&self, config: &GlobalConfig) -> Result<(), StoreError> {
        let _guard = self.config_lock.lock().await;
        self.write_json(CONFIG_FILE, config).await
    }

    async fn list_endpoints(&self) -> Result<Vec<EndpointConfig>, StoreError> {
        self.read_endpoints().await
    }

    async fn get_endpoint(&self, id: &str) -> Result<Option<EndpointConfig>, StoreError> {
        let endpoints = self.read_endpoints().await?;
        Ok(endpoints.into_iter().find(|e| e.id == id))
    }

    async fn save_endpoint(&self, endpoint: EndpointConfig) -> Result<(), StoreError> {
        let _guard = self.endpoints_lock.lock().await;
        let mut endpoints = self.read_endpoints().await?;
        match endpoints.iter_mut().find(|e| e.id == endpoint.id) {
            Some(existing) => *existing = endpoint,
            None => endpoints.push(endpoint),
        }
        self.write_json(ENDPOINTS_FILE, &endpoints).await
    }

    async fn delete_endpoint(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.endpoints_lock.lock().await;
        let mut endpoints = self.read_endpoints().await?;
        let before = endpoints.len();
        endpoints.retain(|e| e.id != id);
        if endpoints.len() == before {
            return Ok(false);
        }
        self.write_json(ENDPOINTS_FILE, &endpoints).await?;
        Ok(true)
    }

    async fn add_log(&self, log: RequestLog) -> Result<(), StoreError> {
        let _guard = self.logs_lock.lock().await;
        let mut logs = self.read_logs().await?;
        logs.insert(0, log);
        logs.truncate(MAX_RETAINED_LOGS);
        self.write_json(LOGS_FILE, &logs).await
    }

    async fn query_logs(&self, filter: &LogFilter) -> Result<LogPage, StoreError> {
        let logs = self.read_logs().await?;
        Ok(filter.apply(&logs))
    }

    async fn get_log(&self, id: &str) -> Result<Option<RequestLog>, StoreError> {
        let logs = self.read_logs().await?;
        Ok(logs.into_iter().find(|l| l.id == id))
    }

    async fn delete_logs(&self, filter: &LogFilter) -> Result<usize, StoreError> {
        let _guard = self.logs_lock.lock().await;
        let mut logs = self.read_logs().await?;
        let before = logs.len();
        if filter.has_predicates() {
            logs.retain(|l| !filter.matches_any(l));
        } else {
            logs.clear();
        }
        self.write_json(LOGS_FILE, &logs).await?;
        Ok(before - logs.len())
    }

    async fn clear_logs(&self) -> Result<(), StoreError> {
        let _guard = self.logs_lock.lock().await;
        self.write_json(LOGS_FILE, &Vec::<RequestLog>::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, LoggedRequest, LoggingSettings, ResponseSet};
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn log(id: usize) -> RequestLog {
        RequestLog {
            id: id.to_string(),
            timestamp: Utc::now(),
            method: "GET".to_string(),
            path: "/a".to_string(),
            status_code: Some(200),
            request: LoggedRequest::default(),
            response: None,
            duration_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("not-yet-created"));

        assert_eq!(
            store.get_global_config().await.unwrap(),
            GlobalConfig::default()
        );
        assert!(store.list_endpoints().await.unwrap().is_empty());
        assert_eq!(store.query_logs(&LogFilter::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_endpoint_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let mut endpoint = EndpointConfig::new("api/users", None);
        let get = endpoint.methods.get_mut(&HttpMethod::Get).unwrap();
        get.response_sets.push(ResponseSet {
            id: "ok".to_string(),
            name: "OK".to_string(),
            status_code: 200,
            headers: HashMap::from([("X-Test".to_string(), "1".to_string())]),
            body: "{\"ok\":true}".to_string(),
            is_no_response: false,
        });
        get.active_response_set_id = Some("ok".to_string());

        FileStore::new(dir.path())
            .save_endpoint(endpoint.clone())
            .await
            .unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.get_endpoint(&endpoint.id).await.unwrap(),
            Some(endpoint.clone())
        );

        assert!(reopened.delete_endpoint(&endpoint.id).await.unwrap());
        assert!(reopened.get_endpoint(&endpoint.id).await.unwrap().is_none());
        assert!(!dir.path().join("endpoints.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_global_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let config = GlobalConfig {
            logging: LoggingSettings {
                request: false,
                response: false,
            },
        };

        store.save_global_config(&config).await.unwrap();
        assert_eq!(store.get_global_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_log_retention_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        for i in 0..MAX_RETAINED_LOGS + 5 {
            store.add_log(log(i)).await.unwrap();
        }

        let page = store.query_logs(&LogFilter::default()).await.unwrap();
        assert_eq!(page.total, MAX_RETAINED_LOGS);
        assert_eq!(page.logs[0].id, "1004");
        assert_eq!(page.logs[MAX_RETAINED_LOGS - 1].id, "5");
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(dir.path()));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add_log(log(i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.query_logs(&LogFilter::default()).await.unwrap().total, 20);
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(ENDPOINTS_FILE), "{not json").unwrap();

        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.list_endpoints().await,
            Err(StoreError::Serialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_clear_logs() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.add_log(log(1)).await.unwrap();
        store.clear_logs().await.unwrap();

        assert!(store.get_log("1").await.unwrap().is_none());
        let raw = std::fs::read_to_string(dir.path().join(LOGS_FILE)).unwrap();
        assert_eq!(raw.trim(), "[]");
    }
}
