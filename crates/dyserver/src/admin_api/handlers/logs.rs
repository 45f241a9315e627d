//! Request log handlers.

use crate::admin_api::types::*;
use crate::store::ConfigStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// GET /logs - Filtered, paginated log listing (newest first)
pub async fn handle_query(query: Option<&str>, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    let params = LogQueryParams::parse(query);

    match store.query_logs(&params.to_page_filter()).await {
        Ok(page) => json_response(
            StatusCode::OK,
            &json!({
                "logs": page.logs,
                "total": page.total,
                "limit": params.limit,
                "offset": params.offset,
            }),
        ),
        Err(e) => store_error(e),
    }
}

/// GET /logs/:id - One log record
pub async fn handle_get(id: &str, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    match store.get_log(id).await {
        Ok(Some(log)) => json_response(StatusCode::OK, &log),
        Ok(None) => error_response(StatusCode::NOT_FOUND, &format!("Log {id} not found")),
        Err(e) => store_error(e),
    }
}

/// DELETE /logs - Delete logs matching any given predicate, or all logs
pub async fn handle_delete(query: Option<&str>, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    let filter = LogQueryParams::parse(query).to_predicate_filter();

    match store.delete_logs(&filter).await {
        Ok(deleted) => {
            info!("Deleted {} request logs", deleted);
            json_response(StatusCode::OK, &json!({ "deleted": deleted }))
        }
        Err(e) => store_error(e),
    }
}
