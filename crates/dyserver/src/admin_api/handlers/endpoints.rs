//! Endpoint CRUD handlers.

use crate::admin_api::types::*;
use crate::model::EndpointConfig;
use crate::store::ConfigStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::info;

fn endpoint_not_found(id: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, &format!("Endpoint {id} not found"))
}

/// GET /endpoints - List all endpoints
pub async fn handle_list(store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    match store.list_endpoints().await {
        Ok(endpoints) => json_response(StatusCode::OK, &endpoints),
        Err(e) => store_error(e),
    }
}

/// POST /endpoints - Create an endpoint with default method settings
pub async fn handle_create<B>(req: Request<B>, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let create: CreateEndpointRequest = match parse_json_body(req, "endpoint").await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let Some(path) = create.path.filter(|p| !p.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Endpoint path is required");
    };

    let endpoint = EndpointConfig::new(path, create.description);
    match store.save_endpoint(endpoint.clone()).await {
        Ok(()) => {
            info!("Created endpoint {} ({})", endpoint.path, endpoint.id);
            json_response(StatusCode::CREATED, &endpoint)
        }
        Err(e) => store_error(e),
    }
}

/// GET /endpoints/:id - Get one endpoint
pub async fn handle_get(id: &str, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    match store.get_endpoint(id).await {
        Ok(Some(endpoint)) => json_response(StatusCode::OK, &endpoint),
        Ok(None) => endpoint_not_found(id),
        Err(e) => store_error(e),
    }
}

/// PUT /endpoints/:id - Replace an endpoint wholesale
pub async fn handle_replace<B>(
    id: &str,
    req: Request<B>,
    store: Arc<dyn ConfigStore>,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let mut endpoint: EndpointConfig = match parse_json_body(req, "endpoint").await {
        Ok(e) => e,
        Err(resp) => return resp,
    };

    match store.get_endpoint(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return endpoint_not_found(id),
        Err(e) => return store_error(e),
    }

    endpoint.id = id.to_string();
    match store.save_endpoint(endpoint.clone()).await {
        Ok(()) => {
            info!("Updated endpoint {} ({})", endpoint.path, endpoint.id);
            json_response(StatusCode::OK, &endpoint)
        }
        Err(e) => store_error(e),
    }
}

/// DELETE /endpoints/:id - Delete an endpoint
pub async fn handle_delete(id: &str, store: Arc<dyn ConfigStore>) -> Response<Full<Bytes>> {
    match store.delete_endpoint(id).await {
        Ok(true) => {
            info!("Deleted endpoint {}", id);
            build_response(StatusCode::NO_CONTENT, Bytes::new())
        }
        Ok(false) => endpoint_not_found(id),
        Err(e) => store_error(e),
    }
}
