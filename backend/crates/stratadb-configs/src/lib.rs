//! stratadb-configs
//!
//! Server configuration types and loader for StrataDB.

pub mod config;

pub use config::*;
pub use config::defaults;
