//! Sponsored operations.
//!
//! A relayer submits an [`Operation`] on behalf of a swap recipient who may hold no native funds to pay for the
//! close. The registry sponsors it only if the call data is a reveal of a live swap's secret; see
//! [`OperationValidator`].

pub mod call;
pub mod error;
pub mod selector;
pub mod validator;

pub use call::{encode_reveal, OperationCall, RevealCall, REVEAL_CALL_LENGTH};
pub use error::OperationError;
pub use selector::{Selector, REVEAL_SELECTOR, REVEAL_SIGNATURE};
pub use validator::{
    Authorization, AuthorizationStrategy, DenialReason, OperationValidator, RevealAuthorization, SwapLookup,
};

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// A relayed operation, as handed to the registry for validation and execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub sender: Address,
    pub nonce: u64,
    #[serde(with = "hex_bytes")]
    pub call_data: Vec<u8>,
    #[serde(default)]
    pub max_fee_per_gas: u128,
    #[serde(default)]
    pub max_priority_fee_per_gas: u128,
}

impl Operation {
    pub fn new(sender: Address, nonce: u64, call_data: Vec<u8>) -> Self {
        Self { sender, nonce, call_data, max_fee_per_gas: 0, max_priority_fee_per_gas: 0 }
    }

    pub fn with_fees(mut self, max_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    pub fn declares_fees(&self) -> bool {
        self.max_fee_per_gas != 0 || self.max_priority_fee_per_gas != 0
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        hex::decode(crate::helpers::strip_hex_prefix(&s)).map_err(serde::de::Error::custom)
    }
}
