//! Admin API server.

use crate::admin_api::router::route_request;
use crate::store::ConfigStore;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info};

/// Admin API server
pub struct AdminApiServer {
    listener: TcpListener,
    store: Arc<dyn ConfigStore>,
}

impl AdminApiServer {
    /// Bind the admin listener
    pub async fn bind(
        addr: impl ToSocketAddrs,
        store: Arc<dyn ConfigStore>,
    ) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, store })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Run the admin API server
    pub async fn run(self) -> Result<(), anyhow::Error> {
        info!("Admin API listening on http://{}", self.local_addr()?);

        loop {
            let (stream, _) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Accept error on admin API: {}", e);
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let store = Arc::clone(&self.store);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let store = Arc::clone(&store);
                    async move { route_request(req, store).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Admin API connection error: {}", e);
                }
            });
        }
    }
}
