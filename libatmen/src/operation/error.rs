use crate::error::ReadError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("Malformed operation. {0}")]
    MalformedOperation(#[from] ReadError),
}
