//! Admin REST API for endpoint, settings and log management.
//!
//! This module provides:
//! - CRUD over endpoint configurations
//! - Reading and replacing global logging settings
//! - Querying, inspecting and deleting request logs
//! - Configuration export and a health check
//!
//! The API talks to the Configuration Store directly and listens on its own
//! port (default: 2525).

mod handlers;
mod router;
mod server;
mod types;

pub use router::route_request;
pub use server::AdminApiServer;
pub use types::{CreateEndpointRequest, LogQueryParams};
