//! Persisted data model for dyserver.
//!
//! - `endpoint`: virtual routes, per-method configuration, response sets and conditions
//! - `settings`: process-wide settings (logging gates)
//! - `log`: request log records and the configuration export document
//!
//! All types serialize with camelCase field names; this is the on-disk and
//! admin API representation.

mod endpoint;
mod log;
mod settings;

pub use endpoint::{
    normalize_path, ConditionTarget, EndpointConfig, HttpMethod, MethodConfig, ResponseCondition,
    ResponseMode, ResponseSet,
};
pub use log::{ConfigExport, LoggedRequest, LoggedResponse, RequestLog, EXPORT_VERSION};
pub use settings::{GlobalConfig, LoggingSettings};
