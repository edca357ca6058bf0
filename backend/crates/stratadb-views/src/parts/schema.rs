//! Schema definition for the system.parts view
//!
//! Columns (all NOT NULL):
//! - name TEXT: part name, e.g. `202401_1_5_2`
//! - replicated BOOLEAN: part belongs to the replicated dataset
//! - active BOOLEAN: part is in the dataset's active set
//! - marks UBIGINT: index marks (granules) in the part
//! - bytes UBIGINT: on-disk size
//! - modification_time TIMESTAMP(s): last modification of the part
//! - remove_time TIMESTAMP(s): when the part was superseded, epoch if never
//! - refcount UINT: holders of the part other than the view's own
//!   snapshots; the owning dataset counts, so an idle part reports 1
//! - database TEXT, table TEXT, engine TEXT: owning table
//!
//! The candidate stages of the materializer work on prefixes of the same
//! columns, with identical types, so a predicate compiled against one stage
//! means the same thing against the next.

use std::sync::{Arc, OnceLock};

use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use stratadb_commons::SystemTable;

/// Column names of system.parts
pub mod columns {
    pub const NAME: &str = "name";
    pub const REPLICATED: &str = "replicated";
    pub const ACTIVE: &str = "active";
    pub const MARKS: &str = "marks";
    pub const BYTES: &str = "bytes";
    pub const MODIFICATION_TIME: &str = "modification_time";
    pub const REMOVE_TIME: &str = "remove_time";
    pub const REFCOUNT: &str = "refcount";
    pub const DATABASE: &str = "database";
    pub const TABLE: &str = "table";
    pub const ENGINE: &str = "engine";
}

fn utf8(name: &str) -> Field {
    Field::new(name, DataType::Utf8, false)
}

fn flag(name: &str) -> Field {
    Field::new(name, DataType::Boolean, false)
}

fn seconds(name: &str) -> Field {
    Field::new(name, DataType::Timestamp(TimeUnit::Second, None), false)
}

/// Schema provider for system.parts
#[derive(Debug, Clone, Copy)]
pub struct PartsTableSchema;

impl PartsTableSchema {
    /// Cached Arrow schema of the final result
    pub fn schema() -> SchemaRef {
        static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
        SCHEMA
            .get_or_init(|| {
                Arc::new(Schema::new(vec![
                    utf8(columns::NAME),
                    flag(columns::REPLICATED),
                    flag(columns::ACTIVE),
                    Field::new(columns::MARKS, DataType::UInt64, false),
                    Field::new(columns::BYTES, DataType::UInt64, false),
                    seconds(columns::MODIFICATION_TIME),
                    seconds(columns::REMOVE_TIME),
                    Field::new(columns::REFCOUNT, DataType::UInt32, false),
                    utf8(columns::DATABASE),
                    utf8(columns::TABLE),
                    utf8(columns::ENGINE),
                ]))
            })
            .clone()
    }

    /// Single `database` column filtered before any table is looked at
    pub(crate) fn databases_schema() -> SchemaRef {
        static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
        SCHEMA
            .get_or_init(|| Arc::new(Schema::new(vec![utf8(columns::DATABASE)])))
            .clone()
    }

    /// One row per (table, replicated, active) candidate
    pub(crate) fn candidates_schema() -> SchemaRef {
        static SCHEMA: OnceLock<SchemaRef> = OnceLock::new();
        SCHEMA
            .get_or_init(|| {
                Arc::new(Schema::new(vec![
                    utf8(columns::DATABASE),
                    utf8(columns::TABLE),
                    utf8(columns::ENGINE),
                    flag(columns::REPLICATED),
                    flag(columns::ACTIVE),
                ]))
            })
            .clone()
    }

    pub fn table_name() -> &'static str {
        SystemTable::Parts.table_name()
    }
}

/// Cached Arrow schema of system.parts
pub fn parts_schema() -> SchemaRef {
    PartsTableSchema::schema()
}
