//! System handlers: root, health, export.

use crate::admin_api::types::*;
use crate::store::ConfigStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use std::sync::Arc;

/// GET / - Links to the managed collections
pub fn handle_root() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "_links": {
            "endpoints": {"href": "/endpoints"},
            "settings": {"href": "/settings"},
            "logs": {"href": "/logs"},
            "export": {"href": "/export"}
        }
    });
    json_response(StatusCode::OK, &body)
}

/// GET /health - Health check
pub fn handle_health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({"status": "ok"}))
}

/// GET /export - Download the full configuration as a JSON document
pub async fn handle_export(store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    let export = match store.export().await {
        Ok(export) => export,
        Err(e) => return store_error(e),
    };

    let body = match serde_json::to_string_pretty(&export) {
        Ok(body) => body,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let disposition = format!("attachment; filename=\"{}\"", export.file_name());

    build_response_with_headers(
        StatusCode::OK,
        [
            ("Content-Type", "application/json"),
            ("Content-Disposition", disposition.as_str()),
        ],
        body,
    )
}
