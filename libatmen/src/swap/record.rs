use crate::address::Address;
use crate::amount::Amount;
use crate::cryptography::{compress, CommitmentId, CurveError, Point};
use crate::helpers::Timestamp;
use crate::host::Asset;
use crate::swap::error::SwapError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The lifecycle of a swap. Only `Open` swaps are held by the registry; the other two are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapState {
    /// Value is escrowed and may be claimed with the secret until the timelock.
    Open,
    /// The secret was revealed and the value went to the recipient.
    Closed,
    /// The timelock passed and the value went back to the opener.
    Expired,
}

impl Display for SwapState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapState::Open => write!(f, "Open"),
            SwapState::Closed => write!(f, "Closed"),
            SwapState::Expired => write!(f, "Expired"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub id: CommitmentId,
    pub asset: Asset,
    pub value: Amount,
    pub timelock: Timestamp,
    pub recipient: Address,
    pub opener: Address,
    pub state: SwapState,
}

impl Swap {
    pub fn is_open(&self) -> bool {
        self.state == SwapState::Open
    }

    /// Where the escrowed value goes when the swap leaves the `Open` state.
    pub fn payee(&self) -> Option<&Address> {
        match self.state {
            SwapState::Open => None,
            SwapState::Closed => Some(&self.recipient),
            SwapState::Expired => Some(&self.opener),
        }
    }
}

/// The parameters of a new swap. The opener is whoever makes the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub id: CommitmentId,
    pub asset: Asset,
    pub value: Amount,
    pub timelock: Timestamp,
    pub recipient: Address,
}

impl OpenRequest {
    pub fn native(id: CommitmentId, value: Amount, timelock: Timestamp, recipient: Address) -> Self {
        Self { id, asset: Asset::Native, value, timelock, recipient }
    }

    pub fn token(token: Address, id: CommitmentId, value: Amount, timelock: Timestamp, recipient: Address) -> Self {
        Self { id, asset: Asset::Token(token), value, timelock, recipient }
    }

    /// Keys the swap by the id of an opener-supplied commitment point `(x, y)`.
    ///
    /// The point is checked against the curve equation before it is compressed, so no swap can be opened under an
    /// id that no secret opens.
    pub fn from_point(
        x: &[u8; 32],
        y: &[u8; 32],
        asset: Asset,
        value: Amount,
        timelock: Timestamp,
        recipient: Address,
    ) -> Result<Self, SwapError> {
        let q = Point::from_coordinates(x, y)?;
        // compress only fails on the point at infinity
        let id = compress(&q).map_err(|_| CurveError::PointAtInfinity)?;
        Ok(Self { id, asset, value, timelock, recipient })
    }
}

/// Who is calling, and how much native value they attached to the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub attached: Amount,
}

impl CallContext {
    pub fn new(caller: Address) -> Self {
        Self { caller, attached: Amount::ZERO }
    }

    pub fn with_value(caller: Address, attached: Amount) -> Self {
        Self { caller, attached }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payee_follows_state() {
        let mut swap = Swap {
            id: CommitmentId::new([1; 20]),
            asset: Asset::Native,
            value: Amount::from_base_units(5),
            timelock: Timestamp::new(10),
            recipient: Address::new([0xbb; 20]),
            opener: Address::new([0xaa; 20]),
            state: SwapState::Open,
        };
        assert!(swap.payee().is_none());
        swap.state = SwapState::Closed;
        assert_eq!(swap.payee(), Some(&Address::new([0xbb; 20])));
        swap.state = SwapState::Expired;
        assert_eq!(swap.payee(), Some(&Address::new([0xaa; 20])));
        assert_eq!(swap.state.to_string(), "Expired");
    }
}
