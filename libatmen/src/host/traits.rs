use crate::address::Address;
use crate::amount::Amount;
use crate::helpers::Timestamp;
use crate::host::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// What a swap escrows: the ledger's native asset, or a token identified by its contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Native,
    Token(Address),
}

impl Asset {
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(token) => write!(f, "token {token}"),
        }
    }
}

/// Moves value into and out of the registry's custody.
///
/// Implementations must be all-or-nothing: a call that returns an error has moved nothing. Token escrow pulls
/// from the payer's prior allowance; checking that allowance is the ledger's job, not the registry's.
pub trait AssetLedger {
    /// Moves `value` of `asset` from `from` into custody.
    fn escrow(&mut self, from: &Address, asset: &Asset, value: Amount) -> Result<(), LedgerError>;

    /// Moves `value` of `asset` out of custody to `to`.
    fn release(&mut self, to: &Address, asset: &Asset, value: Amount) -> Result<(), LedgerError>;
}

/// The host's notion of "now". Never decreases; the registry never advances it.
pub trait Clock {
    fn now(&self) -> Timestamp;
}
