use datafusion::arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use stratadb_store::StoreError;
use thiserror::Error;

/// Errors raised while materializing a system view
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("DataFusion error: {0}")]
    DataFusion(#[from] DataFusionError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A table captured in the catalog snapshot could not be locked when its
    /// parts were about to be read (typically dropped concurrently).
    #[error("Table {table} captured in the catalog snapshot can no longer be locked: {source}")]
    StorageUnavailable {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for view operations
pub type Result<T> = std::result::Result<T, ViewError>;

impl From<ViewError> for DataFusionError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::DataFusion(e) => e,
            other => DataFusionError::External(Box::new(other)),
        }
    }
}
