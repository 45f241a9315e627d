//! Request log records and the configuration export document.

use super::{EndpointConfig, GlobalConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version number written into export documents
pub const EXPORT_VERSION: u32 = 1;

/// Captured request data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedRequest {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub query: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Captured response data, present only when response logging is enabled
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedResponse {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_set_name: Option<String>,
}

/// One immutable record per served request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub request: LoggedRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<LoggedResponse>,
    pub duration_ms: u64,
}

/// Full configuration snapshot served by the export route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigExport {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub global_config: GlobalConfig,
    pub endpoints: Vec<EndpointConfig>,
}

impl ConfigExport {
    pub fn new(global_config: GlobalConfig, endpoints: Vec<EndpointConfig>) -> Self {
        Self {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            global_config,
            endpoints,
        }
    }

    /// Suggested download file name, e.g. `dyserver-config-2024-05-01.json`
    pub fn file_name(&self) -> String {
        format!(
            "dyserver-config-{}.json",
            self.exported_at.format("%Y-%m-%d")
        )
    }
}
