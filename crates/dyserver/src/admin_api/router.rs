//! Route dispatch logic for the Admin API.

use crate::admin_api::handlers::{endpoints, logs, settings, system};
use crate::admin_api::types::not_found;
use crate::store::ConfigStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Method, Request, Response};
use std::sync::Arc;
use tracing::debug;

/// Parsed admin route
#[derive(Debug, PartialEq, Eq)]
enum AdminRoute {
    /// GET /
    Root,
    /// GET /health
    Health,
    /// GET/POST /endpoints
    Endpoints,
    /// GET/PUT/DELETE /endpoints/:id
    EndpointById(String),
    /// GET/PUT /settings
    Settings,
    /// GET/DELETE /logs
    Logs,
    /// GET /logs/:id
    LogById(String),
    /// GET /export
    Export,
}

impl AdminRoute {
    /// Parse a route from the request path. Trailing and repeated slashes are ignored.
    fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(AdminRoute::Root),
            ["health"] => Some(AdminRoute::Health),
            ["endpoints"] => Some(AdminRoute::Endpoints),
            ["endpoints", id] => Some(AdminRoute::EndpointById(id.to_string())),
            ["settings"] => Some(AdminRoute::Settings),
            ["logs"] => Some(AdminRoute::Logs),
            ["logs", id] => Some(AdminRoute::LogById(id.to_string())),
            ["export"] => Some(AdminRoute::Export),
            _ => None,
        }
    }
}

/// Main request router
pub async fn route_request<B>(
    req: Request<B>,
    store: Arc<dyn ConfigStore>,
) -> Result<Response<Full<Bytes>>, hyper::Error>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|s| s.to_string());

    debug!("Admin API: {} {}", method, path);

    let Some(route) = AdminRoute::parse(&path) else {
        return Ok(not_found());
    };

    let response = match (&method, route) {
        (&Method::GET, AdminRoute::Root) => system::handle_root(),
        (&Method::GET, AdminRoute::Health) => system::handle_health(),
        (&Method::GET, AdminRoute::Export) => system::handle_export(store).await,

        // /endpoints
        (&Method::GET, AdminRoute::Endpoints) => endpoints::handle_list(store).await,
        (&Method::POST, AdminRoute::Endpoints) => endpoints::handle_create(req, store).await,

        // /endpoints/:id
        (&Method::GET, AdminRoute::EndpointById(id)) => endpoints::handle_get(&id, store).await,
        (&Method::PUT, AdminRoute::EndpointById(id)) => {
            endpoints::handle_replace(&id, req, store).await
        }
        (&Method::DELETE, AdminRoute::EndpointById(id)) => {
            endpoints::handle_delete(&id, store).await
        }

        // /settings
        (&Method::GET, AdminRoute::Settings) => settings::handle_get(store).await,
        (&Method::PUT, AdminRoute::Settings) => settings::handle_replace(req, store).await,

        // /logs
        (&Method::GET, AdminRoute::Logs) => logs::handle_query(query.as_deref(), store).await,
        (&Method::DELETE, AdminRoute::Logs) => {
            logs::handle_delete(query.as_deref(), store).await
        }
        (&Method::GET, AdminRoute::LogById(id)) => logs::handle_get(&id, store).await,

        _ => not_found(),
    };

    Ok(response)
}
