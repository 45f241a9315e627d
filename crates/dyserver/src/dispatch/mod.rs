//! Request dispatch and response selection.
//!
//! Data flow for one mocked request:
//! inbound request -> `resolver` -> `selector` (+ `condition`) -> `engine`
//! emits the response -> `logger` persists a record through the store.
//!
//! ## Module Structure
//!
//! - `request`: transport-neutral request and its decomposed views
//! - `resolver`: exact, normalized path matching against stored endpoints
//! - `condition`: evaluation of a single declarative condition
//! - `selector`: response-set choice per mode (default, random, conditional)
//! - `logger`: request log assembly gated by global settings
//! - `engine`: the `Dispatcher` orchestrating all of the above

mod condition;
mod engine;
mod logger;
mod request;
mod resolver;
mod selector;

pub use condition::condition_matches;
pub use engine::{DispatchResponse, Dispatcher, NO_RESPONSE_STATUS};
pub use logger::{build_log, RequestLogger};
pub use request::{normalize_request_path, parse_query_string, IncomingRequest, RequestView};
pub use resolver::resolve;
pub use selector::{select, Selection, SelectionReason};
