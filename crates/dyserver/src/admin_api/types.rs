//! Request/response types and helpers for the Admin API.

use crate::dispatch::parse_query_string;
use crate::store::{LogFilter, StoreError};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Page size used by the log listing when none is requested
pub const DEFAULT_LOG_PAGE_SIZE: usize = 20;

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

/// Individual error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Request to create an endpoint
#[derive(Debug, Deserialize)]
pub struct CreateEndpointRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters of the log routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQueryParams {
    pub path: Option<String>,
    pub method: Option<String>,
    pub status: Option<u16>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for LogQueryParams {
    fn default() -> Self {
        Self {
            path: None,
            method: None,
            status: None,
            limit: DEFAULT_LOG_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl LogQueryParams {
    /// Parse query parameters from query string.
    ///
    /// `page` is 1-based and only used when `offset` is absent. Unparseable
    /// numbers fall back to their defaults.
    pub fn parse(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(q) = query else {
            return params;
        };
        let pairs = parse_query_string(q);

        params.path = pairs.get("path").filter(|p| !p.is_empty()).cloned();
        params.method = pairs
            .get("method")
            .filter(|m| !m.is_empty())
            .map(|m| m.to_ascii_uppercase());
        params.status = pairs.get("status").and_then(|s| s.parse().ok());
        if let Some(limit) = pairs.get("limit").and_then(|l| l.parse::<usize>().ok()) {
            params.limit = limit;
        }

        let page = pairs.get("page").and_then(|p| p.parse::<usize>().ok());
        params.offset = match (pairs.get("offset"), page) {
            (Some(offset), _) => offset.parse().unwrap_or(0),
            (None, Some(page)) => page.saturating_sub(1).saturating_mul(params.limit),
            (None, None) => 0,
        };

        params
    }

    /// Filter with the pagination applied (log listing)
    pub fn to_page_filter(&self) -> LogFilter {
        self.to_predicate_filter().page(self.offset, self.limit)
    }

    /// Filter without pagination (log deletion)
    pub fn to_predicate_filter(&self) -> LogFilter {
        LogFilter {
            path_or_endpoint_id: self.path.clone(),
            method: self.method.clone(),
            status_code: self.status,
            ..Default::default()
        }
    }
}

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    build_response_with_headers(status, [("Content-Type", "application/json")], json)
}

/// Build an HTTP response with the given status and body.
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    build_response_with_headers(status, std::iter::empty::<(&str, &str)>(), body)
}

/// Build an HTTP response with headers.
///
/// Falls back to a minimal 500 response if the builder rejects a header.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder.body(Full::new(body.into())).unwrap_or_else(|_| {
        let mut response = Response::new(Full::new(Bytes::from("Internal Server Error")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

/// Create an error response
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let error = ErrorResponse {
        errors: vec![ErrorDetail {
            code: status.as_str().to_string(),
            message: message.to_string(),
        }],
    };
    json_response(status, &error)
}

/// Create a not found response
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// 500 response for a failed store operation
pub fn store_error(e: StoreError) -> Response<Full<Bytes>> {
    error!("Admin API storage failure: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
}

/// Collect request body into bytes
pub async fn collect_body<B>(req: Request<B>) -> Result<Bytes, String>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    req.collect()
        .await
        .map(|c| c.to_bytes())
        .map_err(|e| format!("Failed to read request body: {e}"))
}

/// Collect and deserialize a JSON body, mapping failures to a 400 response
pub async fn parse_json_body<T, B>(req: Request<B>, what: &str) -> Result<T, Response<Full<Bytes>>>
where
    T: serde::de::DeserializeOwned,
    B: Body,
    B::Error: std::fmt::Display,
{
    let body = collect_body(req)
        .await
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e))?;

    serde_json::from_slice(&body).map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, &format!("Invalid {what} JSON: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_query_params_defaults() {
        let params = LogQueryParams::parse(None);
        assert_eq!(params, LogQueryParams::default());
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_log_query_params_parse() {
        let params = LogQueryParams::parse(Some("path=%2Fapi&method=get&status=404&limit=5"));
        assert_eq!(params.path.as_deref(), Some("/api"));
        assert_eq!(params.method.as_deref(), Some("GET"));
        assert_eq!(params.status, Some(404));
        assert_eq!(params.limit, 5);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_log_query_params_page() {
        let params = LogQueryParams::parse(Some("page=3&limit=10"));
        assert_eq!(params.offset, 20);

        let params = LogQueryParams::parse(Some("page=0"));
        assert_eq!(params.offset, 0);

        // offset wins over page
        let params = LogQueryParams::parse(Some("page=3&offset=7"));
        assert_eq!(params.offset, 7);
    }

    #[test]
    fn test_log_query_params_ignore_garbage() {
        let params = LogQueryParams::parse(Some("status=abc&limit=-1&path="));
        assert_eq!(params.status, None);
        assert_eq!(params.limit, 20);
        assert_eq!(params.path, None);
        assert!(!params.to_predicate_filter().has_predicates());
    }

    #[test]
    fn test_page_filter_carries_pagination() {
        let filter = LogQueryParams::parse(Some("method=POST&offset=4&limit=2")).to_page_filter();
        assert_eq!(filter.method.as_deref(), Some("POST"));
        assert_eq!(filter.offset, Some(4));
        assert_eq!(filter.limit, Some(2));
    }

    #[test]
    fn test_error_response_format() {
        let resp = error_response(StatusCode::BAD_REQUEST, "Test error");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_not_found_response() {
        let resp = not_found();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_json_body_rejects_malformed() {
        let req = Request::new(Full::new(Bytes::from("{not json")));
        let result: Result<CreateEndpointRequest, _> = parse_json_body(req, "endpoint").await;
        let resp = result.unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
