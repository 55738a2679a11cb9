use crate::amount::Amount;
use crate::cryptography::{CommitmentId, CurveError};
use crate::helpers::Timestamp;
use crate::host::LedgerError;
use crate::operation::{DenialReason, OperationError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error(
        "Invalid value. {value} must be greater than the minimum of {minimum} and match the attached value {attached}"
    )]
    InvalidValue { value: Amount, minimum: Amount, attached: Amount },
    #[error("The timelock {timelock} is not in the future (now: {now})")]
    InvalidTimelock { timelock: Timestamp, now: Timestamp },
    #[error("Invalid commitment point. {0}")]
    InvalidPoint(#[from] CurveError),
    #[error("A swap cannot pay out to the zero address")]
    InvalidRecipient,
    #[error("A swap is already open at {0}")]
    AlreadyOpen(CommitmentId),
    #[error("No open swap at {0}")]
    NotFound(CommitmentId),
    #[error("The secret does not open the swap at {0}")]
    InvalidSecret(CommitmentId),
    #[error("The swap at {id} expired at {timelock}")]
    Expired { id: CommitmentId, timelock: Timestamp },
    #[error("The swap at {id} cannot be expired before {timelock}")]
    NotYetExpired { id: CommitmentId, timelock: Timestamp },
    #[error("Transfer failed. {0}")]
    Transfer(#[from] LedgerError),
    #[error("The operation is not authorized: {0}")]
    Unauthorized(DenialReason),
    #[error(transparent)]
    Operation(#[from] OperationError),
}
