use thiserror::Error;

/// Errors raised by the storage model and the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Table has been dropped")]
    TableDropped,

    #[error("Invalid part name '{name}': {reason}")]
    InvalidPartName { name: String, reason: String },

    #[error("Duplicate part: {0}")]
    DuplicatePart(String),

    #[error("Part {part} is already covered by active part {covering}")]
    CoveredPart { part: String, covering: String },

    #[error("Unknown storage engine: {0}")]
    UnknownEngine(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;
