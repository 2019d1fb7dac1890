use pitwall_storage::{Collection, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failure of a read view
///
/// An unresolved reference is deliberately absent here: it is data
/// (`null` in the payload), not an error.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A fetch failed outright; nothing of the view is returned
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    /// The primary collection produced zero records
    #[error("No {0} found")]
    EmptyResult(Collection),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CoreError {
    pub fn is_empty_result(&self) -> bool {
        matches!(self, CoreError::EmptyResult(_))
    }
}
