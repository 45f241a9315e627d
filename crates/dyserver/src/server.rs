//! Mock HTTP server: the public listener that serves every configured endpoint.

use crate::dispatch::{
    normalize_request_path, parse_query_string, DispatchResponse, Dispatcher, IncomingRequest,
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::header::{HeaderName, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info, warn};

/// Listener for mocked endpoints
pub struct MockServer {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
}

impl MockServer {
    /// Bind the listener. Port 0 picks an ephemeral port; see [`MockServer::local_addr`].
    pub async fn bind(
        addr: impl ToSocketAddrs,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accept connections until the task is dropped
    pub async fn run(self) -> Result<(), anyhow::Error> {
        info!("Mock server listening on http://{}", self.local_addr()?);

        loop {
            let (stream, remote) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Accept error on mock server: {}", e);
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let dispatcher = Arc::clone(&self.dispatcher);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let dispatcher = Arc::clone(&dispatcher);
                    async move { handle_request(req, dispatcher).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Mock server connection error from {}: {}", remote, e);
                }
            });
        }
    }
}

/// Serve one request through the dispatcher
pub async fn handle_request<B>(
    req: Request<B>,
    dispatcher: Arc<Dispatcher>,
) -> Result<Response<Full<Bytes>>, hyper::Error>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let request = read_request(req).await;
    let method = request.method.clone();
    let path = request.path.clone();

    let response = match dispatcher.dispatch(request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Storage failure while serving {} {}: {}", method, path, e);
            DispatchResponse::json(500, &json!({"error": "Storage failure"}))
        }
    };

    debug!("{} {} -> {}", method, path, response.status);
    Ok(to_hyper_response(response))
}

/// Decompose a hyper request into the transport-neutral form.
///
/// Repeated headers are joined with ", ". An unreadable body is treated as empty.
pub async fn read_request<B>(req: Request<B>) -> IncomingRequest
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();

    let mut headers: HashMap<String, String> = HashMap::new();
    for name in parts.headers.keys() {
        let joined = parts
            .headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        headers.insert(name.as_str().to_ascii_lowercase(), joined);
    }

    let body = match body.collect().await {
        Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
        Err(e) => {
            debug!("Failed to read request body: {}", e);
            String::new()
        }
    };

    IncomingRequest {
        method: parts.method.as_str().to_string(),
        path: normalize_request_path(parts.uri.path()),
        query: parse_query_string(parts.uri.query().unwrap_or("")),
        headers,
        body,
    }
}

/// Convert a dispatch result into a hyper response. Headers that are not
/// valid HTTP are skipped.
pub fn to_hyper_response(response: DispatchResponse) -> Response<Full<Bytes>> {
    let mut hyper_response = Response::new(Full::new(Bytes::from(response.body)));
    *hyper_response.status_mut() =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let headers = hyper_response.headers_mut();
    for (key, value) in &response.headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!("Skipping invalid response header '{}: {}'", key, value),
        }
    }

    hyper_response
}
