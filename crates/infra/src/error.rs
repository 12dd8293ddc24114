use thiserror::Error;

use stockroom_core::DomainError;

/// Failure of a warehouse operation.
///
/// Domain rule violations pass through unchanged; `Storage` covers failures of
/// the store itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl WarehouseError {
    /// The domain rule that was violated, if any.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            WarehouseError::Domain(err) => Some(err),
            WarehouseError::Storage(_) => None,
        }
    }
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;
