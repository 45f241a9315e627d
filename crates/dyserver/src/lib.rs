//! dyserver: a configurable mock HTTP endpoint server.
//!
//! Endpoints are stored records; every inbound request is resolved against
//! them at request time, a response set is chosen per the method's mode, the
//! canned reply is emitted verbatim and a log record is written.

// ===== Domain types and persistence =====
pub mod model;
pub mod store;

// ===== Request handling =====
pub mod dispatch;
pub mod server;

// ===== Administration and process setup =====
pub mod admin_api;
pub mod config;

pub use dispatch::{DispatchResponse, Dispatcher, IncomingRequest};
pub use server::MockServer;
pub use store::{create_store, ConfigStore, StoreError};
