//! Workspace-wide constants.

/// Storage engine names as reported by `TableStorage::engine_name()` and
/// accepted in `[[catalog.tables]]` configuration entries.
pub mod engines {
    /// Plain part-based engine with a single local part set.
    pub const MERGE_TREE: &str = "MergeTree";
    /// Replicated part-based engine, optionally with a local-only part set.
    pub const REPLICATED_MERGE_TREE: &str = "ReplicatedMergeTree";
    /// In-memory engine without parts.
    pub const MEMORY: &str = "Memory";

    /// All engine names the catalog bootstrap knows how to create.
    pub const ALL: &[&str] = &[MERGE_TREE, REPLICATED_MERGE_TREE, MEMORY];
}

/// Default database created on startup when the configuration lists none.
pub const DEFAULT_DATABASE: &str = "default";

/// Default schema name that hosts the system views.
pub const SYSTEM_SCHEMA: &str = "system";
