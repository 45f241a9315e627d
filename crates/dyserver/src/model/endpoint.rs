//! Endpoint configuration types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// HTTP Methods
// ============================================================================

/// HTTP methods that can carry distinct behavior on an endpoint.
///
/// Any other method reaching the dispatcher is treated as undeclared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Method names are matched exactly (upper-case), as they arrive on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("unsupported method: {other}")),
        }
    }
}

// ============================================================================
// Response Selection
// ============================================================================

/// Policy used to choose a response set for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Default,
    Random,
    Conditional,
}

/// One canned reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Emitted verbatim; never re-validated or re-serialized
    #[serde(default)]
    pub body: String,
    /// Simulate an unanswered request; headers and body are ignored
    #[serde(default)]
    pub is_no_response: bool,
}

fn default_status_code() -> u16 {
    200
}

/// Which decomposed view of the request a condition inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionTarget {
    Header,
    Body,
    Query,
}

/// One rule for conditional mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCondition {
    pub target: ConditionTarget,
    pub key: String,
    pub value: String,
    pub response_set_id: String,
}

/// Behavior of a single HTTP method on an endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub mode: ResponseMode,
    /// Declaration order matters: the first set is the final fallback
    #[serde(default)]
    pub response_sets: Vec<ResponseSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_response_set_id: Option<String>,
    /// Evaluated in order, first match wins
    #[serde(default)]
    pub conditions: Vec<ResponseCondition>,
}

impl MethodConfig {
    /// Look up a response set by id. Dangling ids simply yield `None`.
    pub fn response_set(&self, id: &str) -> Option<&ResponseSet> {
        self.response_sets.iter().find(|set| set.id == id)
    }

    /// The active response set, if one is configured and still declared
    pub fn active_response_set(&self) -> Option<&ResponseSet> {
        self.active_response_set_id
            .as_deref()
            .and_then(|id| self.response_set(id))
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// One virtual route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Assigned by the store on creation
    #[serde(default)]
    pub id: String,
    /// May be stored with or without a leading slash; see [`normalize_path`]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: BTreeMap<HttpMethod, MethodConfig>,
}

impl EndpointConfig {
    /// Create an endpoint with a fresh id and the creation defaults:
    /// every method present, only GET enabled, no response sets.
    pub fn new(path: impl Into<String>, description: Option<String>) -> Self {
        let methods = HttpMethod::ALL
            .into_iter()
            .map(|method| {
                (
                    method,
                    MethodConfig {
                        enabled: method == HttpMethod::Get,
                        ..Default::default()
                    },
                )
            })
            .collect();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path: path.into(),
            description: description.filter(|d| !d.is_empty()),
            methods,
        }
    }

    /// Configured path with a guaranteed leading slash
    pub fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }

    pub fn method(&self, method: HttpMethod) -> Option<&MethodConfig> {
        self.methods.get(&method)
    }
}

/// Ensure a path begins with `/`
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_endpoint_defaults() {
        let endpoint = EndpointConfig::new("api/users", Some("Users".to_string()));

        assert!(!endpoint.id.is_empty());
        assert_eq!(endpoint.methods.len(), 4);
        for method in HttpMethod::ALL {
            let config = endpoint.method(method).unwrap();
            assert_eq!(config.enabled, method == HttpMethod::Get);
            assert_eq!(config.mode, ResponseMode::Default);
            assert!(config.response_sets.is_empty());
            assert!(config.conditions.is_empty());
            assert!(config.active_response_set_id.is_none());
        }
    }

    #[test]
    fn test_new_endpoint_ids_are_unique() {
        let a = EndpointConfig::new("/a", None);
        let b = EndpointConfig::new("/a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_description_is_dropped() {
        let endpoint = EndpointConfig::new("/a", Some(String::new()));
        assert!(endpoint.description.is_none());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("api/users"), "/api/users");
        assert_eq!(normalize_path("/api/users"), "/api/users");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_method_from_str_is_exact() {
        assert_eq!("GET".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("DELETE".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("PATCH".parse::<HttpMethod>().is_err());
        assert!("get".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_endpoint_wire_format() {
        let value = json!({
            "id": "ep-1",
            "path": "api/users",
            "methods": {
                "GET": {
                    "enabled": true,
                    "mode": "conditional",
                    "responseSets": [{
                        "id": "ok",
                        "name": "OK",
                        "statusCode": 200,
                        "headers": {"Content-Type": "application/json"},
                        "body": "{\"ok\":true}",
                        "isNoResponse": false
                    }],
                    "activeResponseSetId": "ok",
                    "conditions": [{
                        "target": "query",
                        "key": "type",
                        "value": "error",
                        "responseSetId": "err"
                    }]
                }
            }
        });

        let endpoint: EndpointConfig = serde_json::from_value(value).unwrap();
        let get = endpoint.method(HttpMethod::Get).unwrap();
        assert_eq!(get.mode, ResponseMode::Conditional);
        assert_eq!(get.conditions[0].target, ConditionTarget::Query);
        assert_eq!(get.active_response_set().unwrap().name, "OK");
        assert!(endpoint.method(HttpMethod::Post).is_none());
        assert!(endpoint.description.is_none());

        let back = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(back["methods"]["GET"]["responseSets"][0]["statusCode"], 200);
        assert_eq!(back["methods"]["GET"]["activeResponseSetId"], "ok");
    }

    #[test]
    fn test_response_set_defaults() {
        let set: ResponseSet = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(set.status_code, 200);
        assert!(set.headers.is_empty());
        assert!(set.body.is_empty());
        assert!(!set.is_no_response);
    }

    #[test]
    fn test_dangling_active_response_set() {
        let config = MethodConfig {
            enabled: true,
            active_response_set_id: Some("missing".to_string()),
            ..Default::default()
        };
        assert!(config.active_response_set().is_none());
    }
}
