use crate::address::Address;
use crate::amount::Amount;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{holder} holds {available} but {needed} is required")]
    InsufficientFunds { holder: Address, needed: Amount, available: Amount },
    #[error("{owner} has approved {approved} of token {token} but {needed} is required")]
    InsufficientAllowance { token: Address, owner: Address, needed: Amount, approved: Amount },
    #[error("The transfer would overflow the recipient's balance")]
    Overflow,
}
