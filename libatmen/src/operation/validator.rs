use crate::cryptography::{verify_reveal, CommitmentId, Secret};
use crate::helpers::Timestamp;
use crate::operation::call::OperationCall;
use crate::operation::error::OperationError;
use crate::operation::selector::Selector;
use crate::operation::Operation;
use log::*;
use std::fmt::Display;

/// Read-only view of the swaps an operation may target.
pub trait SwapLookup {
    /// The timelock of the live swap at `id`, if there is one.
    fn open_swap_timelock(&self, id: &CommitmentId) -> Option<Timestamp>;

    fn now(&self) -> Timestamp;
}

/// Decides whether a revealed secret grants the right to act on a commitment.
pub trait AuthorizationStrategy {
    fn authorize(&self, id: &CommitmentId, secret: &Secret) -> bool;
}

/// Knowledge of the commitment's secret is the only credential. No signature is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevealAuthorization;

impl AuthorizationStrategy for RevealAuthorization {
    fn authorize(&self, id: &CommitmentId, secret: &Secret) -> bool {
        verify_reveal(id, secret)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    UnsupportedSelector(Selector),
    /// The operation asks the sponsor to pay a fee premium.
    FeesDeclared,
    NonCanonicalId,
    SecretOutOfRange,
    NoOpenSwap(CommitmentId),
    /// The swap is live but its timelock has passed, so a close would fail.
    SwapExpired(CommitmentId),
    SecretMismatch(CommitmentId),
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::UnsupportedSelector(s) => write!(f, "selector {s} is not sponsored"),
            DenialReason::FeesDeclared => write!(f, "sponsored operations must not declare fees"),
            DenialReason::NonCanonicalId => write!(f, "the id word has non-zero padding"),
            DenialReason::SecretOutOfRange => write!(f, "the secret is not a valid scalar"),
            DenialReason::NoOpenSwap(id) => write!(f, "no open swap at {id}"),
            DenialReason::SwapExpired(id) => write!(f, "the swap at {id} has passed its timelock"),
            DenialReason::SecretMismatch(id) => write!(f, "the secret does not open {id}"),
        }
    }
}

/// The outcome of checking an operation.
#[derive(Debug, Clone)]
pub enum Authorization {
    Granted { id: CommitmentId, secret: Secret },
    Denied(DenialReason),
}

impl Authorization {
    pub fn is_granted(&self) -> bool {
        matches!(self, Authorization::Granted { .. })
    }
}

/// Pre-execution check for sponsored operations.
///
/// An operation is sponsored when it carries reveal call data for a live swap, the secret opens that swap, and it
/// declares no fee premium. Layout errors are reported as errors; every other failure is a plain denial.
#[derive(Debug, Clone, Default)]
pub struct OperationValidator<A = RevealAuthorization> {
    strategy: A,
}

impl OperationValidator<RevealAuthorization> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: AuthorizationStrategy> OperationValidator<A> {
    pub fn with_strategy(strategy: A) -> Self {
        Self { strategy }
    }

    pub fn validate<S: SwapLookup>(&self, op: &Operation, swaps: &S) -> Result<bool, OperationError> {
        Ok(self.check(op, swaps)?.is_granted())
    }

    pub fn check<S: SwapLookup>(&self, op: &Operation, swaps: &S) -> Result<Authorization, OperationError> {
        let call = OperationCall::decode(&op.call_data)?;
        let auth = self.check_call(op, call, swaps);
        match &auth {
            Authorization::Granted { id, .. } => {
                debug!("Operation from {} (nonce {}) may reveal {id}", op.sender, op.nonce)
            }
            Authorization::Denied(reason) => {
                debug!("Operation from {} (nonce {}) denied: {reason}", op.sender, op.nonce)
            }
        }
        Ok(auth)
    }

    fn check_call<S: SwapLookup>(&self, op: &Operation, call: OperationCall, swaps: &S) -> Authorization {
        let call = match call {
            OperationCall::Reveal(call) => call,
            OperationCall::Unsupported(selector) => {
                return Authorization::Denied(DenialReason::UnsupportedSelector(selector))
            }
        };
        if op.declares_fees() {
            return Authorization::Denied(DenialReason::FeesDeclared);
        }
        let Some(id) = call.commitment_id() else {
            return Authorization::Denied(DenialReason::NonCanonicalId);
        };
        let Some(secret) = call.secret() else {
            return Authorization::Denied(DenialReason::SecretOutOfRange);
        };
        let Some(timelock) = swaps.open_swap_timelock(&id) else {
            return Authorization::Denied(DenialReason::NoOpenSwap(id));
        };
        if swaps.now() >= timelock {
            return Authorization::Denied(DenialReason::SwapExpired(id));
        }
        if !self.strategy.authorize(&id, &secret) {
            return Authorization::Denied(DenialReason::SecretMismatch(id));
        }
        Authorization::Granted { id, secret }
    }
}
