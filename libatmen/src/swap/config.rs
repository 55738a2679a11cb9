use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// The smallest value a swap may escrow is strictly greater than this, in base units.
pub const DEFAULT_MINIMUM_VALUE: Amount = Amount::from_base_units(1_000_000_000_000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// `open` rejects any swap whose value is not strictly greater than this.
    #[serde(default = "default_minimum_value")]
    pub minimum_value: Amount,
}

fn default_minimum_value() -> Amount {
    DEFAULT_MINIMUM_VALUE
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { minimum_value: DEFAULT_MINIMUM_VALUE }
    }
}

impl RegistryConfig {
    pub fn with_minimum_value(minimum_value: Amount) -> Self {
        Self { minimum_value }
    }
}
