use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub datafusion: DataFusionSettings,
    #[serde(default)]
    pub system_tables: SystemTablesSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides, e.g.:
    /// [logging.targets]
    /// datafusion = "info"
    /// stratadb_views = "trace"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: default_true(),
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// DataFusion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFusionSettings {
    /// Number of partitions for parallel execution (default: number of CPU cores)
    #[serde(default = "default_datafusion_target_partitions")]
    pub target_partitions: usize,

    /// Batch size for record processing (default: 8192)
    #[serde(default = "default_datafusion_batch_size")]
    pub batch_size: usize,
}

impl Default for DataFusionSettings {
    fn default() -> Self {
        Self {
            target_partitions: default_datafusion_target_partitions(),
            batch_size: default_datafusion_batch_size(),
        }
    }
}

/// System views settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemTablesSettings {
    /// Schema the system views are registered under (default: "system")
    #[serde(default = "default_system_schema_name")]
    pub schema_name: String,
}

impl Default for SystemTablesSettings {
    fn default() -> Self {
        Self {
            schema_name: default_system_schema_name(),
        }
    }
}

/// Databases and tables created at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_databases")]
    pub databases: Vec<String>,

    /// Superseded parts older than this are removed once nobody holds them
    #[serde(default = "default_old_parts_lifetime_secs")]
    pub old_parts_lifetime_secs: i64,

    #[serde(default)]
    pub tables: Vec<TableSettings>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            databases: default_databases(),
            old_parts_lifetime_secs: default_old_parts_lifetime_secs(),
            tables: Vec::new(),
        }
    }
}

/// One `[[catalog.tables]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    pub database: String,
    pub name: String,
    /// "MergeTree", "ReplicatedMergeTree" or "Memory"
    #[serde(default = "default_table_engine")]
    pub engine: String,
    /// ReplicatedMergeTree only: also keep a local, unreplicated dataset
    #[serde(default)]
    pub with_unreplicated: bool,
    /// Parts committed at startup, in order; later parts may supersede
    /// earlier ones.
    #[serde(default)]
    pub parts: Vec<PartSettings>,
}

/// One part committed at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSettings {
    pub name: String,
    #[serde(default)]
    pub marks: u64,
    #[serde(default)]
    pub bytes: u64,
    /// Commit into the unreplicated dataset of a ReplicatedMergeTree table
    #[serde(default)]
    pub unreplicated: bool,
}
