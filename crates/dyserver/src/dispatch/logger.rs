//! Request log assembly.

use super::engine::DispatchResponse;
use super::request::IncomingRequest;
use crate::model::{LoggedRequest, LoggedResponse, LoggingSettings, RequestLog, ResponseSet};
use crate::store::{ConfigStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Build the log record for a served request, or `None` when request logging
/// is switched off. The `response` part is omitted entirely unless response
/// logging is on.
pub fn build_log(
    settings: &LoggingSettings,
    request: &IncomingRequest,
    response_set: &ResponseSet,
    response: &DispatchResponse,
    elapsed: Duration,
) -> Option<RequestLog> {
    if !settings.request {
        return None;
    }

    let logged_response = settings.response.then(|| LoggedResponse {
        headers: response.headers.iter().cloned().collect::<HashMap<_, _>>(),
        body: (!response_set.is_no_response).then(|| response.body.clone()),
        response_set_id: Some(response_set.id.clone()),
        response_set_name: Some(response_set.name.clone()),
    });

    Some(RequestLog {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now(),
        method: request.method.clone(),
        path: request.path.clone(),
        status_code: Some(response.status),
        request: LoggedRequest {
            headers: request.headers.clone(),
            query: request.query.clone(),
            body: Some(request.body.clone()),
        },
        response: logged_response,
        duration_ms: elapsed.as_millis() as u64,
    })
}

/// Writes request logs through the store, honouring the global logging gates
#[derive(Clone)]
pub struct RequestLogger {
    store: Arc<dyn ConfigStore>,
}

impl RequestLogger {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Record one served request. Settings are read at call time so changes
    /// made through the admin API apply to the next request.
    pub async fn record(
        &self,
        request: &IncomingRequest,
        response_set: &ResponseSet,
        response: &DispatchResponse,
        elapsed: Duration,
    ) -> Result<(), StoreError> {
        let settings = self.store.get_global_config().await?.logging;
        let Some(log) = build_log(&settings, request, response_set, response, elapsed) else {
            debug!("Request logging disabled, skipping {} {}", request.method, request.path);
            return Ok(());
        };

        self.store.add_log(log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_set(no_response: bool) -> ResponseSet {
        ResponseSet {
            id: "set-1".to_string(),
            name: "Happy path".to_string(),
            status_code: 201,
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: r#"{"id":1}"#.to_string(),
            is_no_response: no_response,
        }
    }

    fn request() -> IncomingRequest {
        IncomingRequest::new("POST", "/api/users")
            .with_query_string("dry=1")
            .with_header("Accept", "application/json")
            .with_body(r#"{"name":"a"}"#)
    }

    fn settings(request: bool, response: bool) -> LoggingSettings {
        LoggingSettings { request, response }
    }

    #[test]
    fn test_request_gate_off_builds_nothing() {
        let set = response_set(false);
        let response = DispatchResponse::from_response_set(&set);
        for response_flag in [true, false] {
            assert!(build_log(
                &settings(false, response_flag),
                &request(),
                &set,
                &response,
                Duration::from_millis(5)
            )
            .is_none());
        }
    }

    #[test]
    fn test_full_log_record() {
        let set = response_set(false);
        let response = DispatchResponse::from_response_set(&set);
        let log = build_log(
            &settings(true, true),
            &request(),
            &set,
            &response,
            Duration::from_millis(12),
        )
        .unwrap();

        assert_eq!(log.method, "POST");
        assert_eq!(log.path, "/api/users");
        assert_eq!(log.status_code, Some(201));
        assert_eq!(log.duration_ms, 12);
        assert_eq!(log.request.query.get("dry").unwrap(), "1");
        assert_eq!(log.request.headers.get("accept").unwrap(), "application/json");
        assert_eq!(log.request.body.as_deref(), Some(r#"{"name":"a"}"#));

        let logged = log.response.unwrap();
        assert_eq!(logged.body.as_deref(), Some(r#"{"id":1}"#));
        assert_eq!(logged.response_set_id.as_deref(), Some("set-1"));
        assert_eq!(logged.response_set_name.as_deref(), Some("Happy path"));
        assert_eq!(logged.headers.get("Content-Type").unwrap(), "application/json");
    }

    #[test]
    fn test_response_gate_off_omits_response() {
        let set = response_set(false);
        let response = DispatchResponse::from_response_set(&set);
        let log = build_log(
            &settings(true, false),
            &request(),
            &set,
            &response,
            Duration::ZERO,
        )
        .unwrap();
        assert!(log.response.is_none());
        assert_eq!(log.status_code, Some(201));
    }

    #[test]
    fn test_no_response_set_logs_substitute_status() {
        let set = response_set(true);
        let response = DispatchResponse::no_response();
        let log = build_log(&settings(true, true), &request(), &set, &response, Duration::ZERO)
            .unwrap();

        assert_eq!(log.status_code, Some(444));
        let logged = log.response.unwrap();
        assert!(logged.body.is_none());
        assert!(logged.headers.is_empty());
        assert_eq!(logged.response_set_id.as_deref(), Some("set-1"));
    }

    #[test]
    fn test_empty_request_body_is_logged_verbatim() {
        let set = response_set(false);
        let response = DispatchResponse::from_response_set(&set);
        let log = build_log(
            &settings(true, true),
            &IncomingRequest::new("GET", "/a"),
            &set,
            &response,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(log.request.body.as_deref(), Some(""));
    }
}
