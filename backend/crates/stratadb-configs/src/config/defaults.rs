use num_cpus;
use stratadb_commons::{engines, DEFAULT_DATABASE, SYSTEM_SCHEMA};

// Logging defaults
pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_true() -> bool {
    true
}

// DataFusion defaults
pub fn default_datafusion_target_partitions() -> usize {
    num_cpus::get()
}

pub fn default_datafusion_batch_size() -> usize {
    8192
}

// System views
pub fn default_system_schema_name() -> String {
    SYSTEM_SCHEMA.to_string()
}

// Catalog defaults
pub fn default_databases() -> Vec<String> {
    vec![DEFAULT_DATABASE.to_string()]
}

pub fn default_table_engine() -> String {
    engines::MERGE_TREE.to_string()
}

pub fn default_old_parts_lifetime_secs() -> i64 {
    480 // 8 minutes
}
