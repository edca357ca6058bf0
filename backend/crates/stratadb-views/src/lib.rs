//! # stratadb-views
//!
//! Read-only system views exposing storage engine internals through
//! DataFusion's ordinary table interface.
//!
//! - `system.parts`: one row per data part of every part-based table
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use stratadb_views::register_system_schema;
//!
//! let ctx = SessionContext::new();
//! register_system_schema(&ctx, catalog, "system")?;
//!
//! // SELECT name, active, bytes FROM system.parts WHERE "table" = 'hits';
//! ```

pub mod error;
pub mod parts;
pub mod predicate;
pub mod system_schema_provider;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{Result, ViewError};
pub use parts::{parts_schema, PartsTableProvider, PartsView};
pub use predicate::PushdownPredicate;
pub use system_schema_provider::{register_system_schema, SystemSchemaProvider};
