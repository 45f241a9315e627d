//! The Dispatcher: end-to-end handling of one mocked request.

use super::logger::RequestLogger;
use super::request::IncomingRequest;
use super::resolver::resolve;
use super::selector::select;
use crate::model::{HttpMethod, ResponseSet};
use crate::store::{ConfigStore, StoreError};
use hyper::StatusCode;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Substitute status for "no response" sets. The connection is not dropped;
/// the client receives this status with an empty body.
pub const NO_RESPONSE_STATUS: u16 = 444;

/// Whether `code` can be sent as a final response. Informational 1xx codes
/// are rejected by hyper, so they count as invalid here.
fn is_final_status(code: u16) -> bool {
    (200..=999).contains(&code) && StatusCode::from_u16(code).is_ok()
}

/// Response produced by the dispatcher, independent of the HTTP stack
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl DispatchResponse {
    /// Compact JSON body with a JSON content type
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: value.to_string(),
        }
    }

    /// Empty response carrying [`NO_RESPONSE_STATUS`]
    pub fn no_response() -> Self {
        Self {
            status: NO_RESPONSE_STATUS,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Declared status, headers and body, emitted verbatim
    pub fn from_response_set(set: &ResponseSet) -> Self {
        let mut headers: Vec<(String, String)> = set
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();

        Self {
            status: set.status_code,
            headers,
            body: set.body.clone(),
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Resolves, selects, responds and logs.
///
/// Random selection draws from the generator owned by the dispatcher, so a
/// seeded dispatcher is fully reproducible.
pub struct Dispatcher {
    store: Arc<dyn ConfigStore>,
    logger: RequestLogger,
    rng: Mutex<StdRng>,
}

impl Dispatcher {
    /// Dispatcher drawing random selections from OS entropy
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Dispatcher with a reproducible random sequence
    pub fn with_seed(store: Arc<dyn ConfigStore>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(store: Arc<dyn ConfigStore>, rng: StdRng) -> Self {
        Self {
            logger: RequestLogger::new(Arc::clone(&store)),
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Handle one request.
    ///
    /// Unknown paths (404), disabled or undeclared methods (405) and methods
    /// without response sets (500) return before any logging. Every other
    /// outcome is logged according to the global settings. Store failures
    /// abort the dispatch.
    pub async fn dispatch(&self, request: IncomingRequest) -> Result<DispatchResponse, StoreError> {
        let started = Instant::now();

        let endpoints = self.store.list_endpoints().await?;
        let Some(endpoint) = resolve(&endpoints, &request.path) else {
            debug!("No endpoint configured for {}", request.path);
            return Ok(DispatchResponse::json(
                404,
                &json!({"error": "Endpoint not found", "path": request.path}),
            ));
        };

        let method_config = request
            .method
            .parse::<HttpMethod>()
            .ok()
            .and_then(|method| endpoint.method(method))
            .filter(|config| config.enabled);
        let Some(method_config) = method_config else {
            debug!(
                endpoint_id = %endpoint.id,
                "Method {} not allowed on {}", request.method, request.path
            );
            return Ok(DispatchResponse::json(
                405,
                &json!({"error": "Method not allowed"}),
            ));
        };

        let view = request.view();
        let selection = {
            let mut rng = self.rng.lock();
            select(method_config, &view, &mut *rng)
        };
        let Some(response_set) = selection.response_set else {
            warn!(
                endpoint_id = %endpoint.id,
                "{} {} has no response sets configured", request.method, request.path
            );
            return Ok(DispatchResponse::json(
                500,
                &json!({"error": "No response set configured"}),
            ));
        };

        debug!(
            endpoint_id = %endpoint.id,
            response_set_id = %response_set.id,
            reason = %selection.reason,
            "{} {} selected response set '{}'",
            request.method,
            request.path,
            response_set.name
        );

        let response = if response_set.is_no_response {
            DispatchResponse::no_response()
        } else if !is_final_status(response_set.status_code) {
            warn!(
                response_set_id = %response_set.id,
                "Invalid status code {}", response_set.status_code
            );
            DispatchResponse::json(500, &json!({"error": "Invalid status code"}))
        } else {
            DispatchResponse::from_response_set(response_set)
        };

        self.logger
            .record(&request, response_set, &response, started.elapsed())
            .await?;

        Ok(response)
    }
}
