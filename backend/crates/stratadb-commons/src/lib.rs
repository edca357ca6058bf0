//! # stratadb-commons
//!
//! Shared types and constants used across all StrataDB crates
//! (stratadb-store, stratadb-views, stratadb-server). It has zero external
//! dependencies so every other crate can depend on it freely.
//!
//! ## Type-Safe Wrappers
//!
//! - `DatabaseName`: database identifier wrapper
//! - `TableName`: table name wrapper
//! - `TableId`: `{database}.{table}` composite key
//!
//! ## Example Usage
//!
//! ```rust
//! use stratadb_commons::{DatabaseName, TableId, TableName};
//!
//! let table_id = TableId::new(DatabaseName::new("default"), TableName::new("hits"));
//! assert_eq!(table_id.to_string(), "default.hits");
//! ```

pub mod constants;
pub mod models;
pub mod system_tables;

pub use constants::{engines, DEFAULT_DATABASE, SYSTEM_SCHEMA};
pub use models::{DatabaseName, TableId, TableName};
pub use system_tables::SystemTable;
