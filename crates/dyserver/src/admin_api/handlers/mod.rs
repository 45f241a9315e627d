//! Admin API request handlers.

pub mod endpoints;
pub mod logs;
pub mod settings;
pub mod system;
