//! Global settings handlers.

use crate::admin_api::types::*;
use crate::model::GlobalConfig;
use crate::store::ConfigStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::info;

/// GET /settings - Current global settings
pub async fn handle_get(store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    match store.get_global_config().await {
        Ok(config) => json_response(StatusCode::OK, &config),
        Err(e) => store_error(e),
    }
}

/// PUT /settings - Replace global settings
pub async fn handle_replace<B>(req: Request<B>, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let config: GlobalConfig = match parse_json_body(req, "settings").await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match store.save_global_config(&config).await {
        Ok(()) => {
            info!(
                request_logging = config.logging.request,
                response_logging = config.logging.response,
                "Global settings updated"
            );
            json_response(StatusCode::OK, &config)
        }
        Err(e) => store_error(e),
    }
}
