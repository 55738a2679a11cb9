use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of base units in one whole unit of an asset (18 decimal places).
pub const BASE_UNITS_PER_UNIT: u128 = 1_000_000_000_000_000_000;
const DECIMALS: usize = 18;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    /// The value in the smallest indivisible unit of the asset
    amount: u128,
}

impl Amount {
    pub const ZERO: Amount = Amount { amount: 0 };

    /// Creates a new `Amount` from a value in base units.
    pub const fn from_base_units(amount: u128) -> Self {
        Amount { amount }
    }

    pub fn to_base_units(&self) -> u128 {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Creates a new `Amount` from a string representing whole units, e.g. `"0.01"`.
    /// Returns `None` if the string is not a valid number representation.
    pub fn from_units(units: &str) -> Option<Self> {
        let mut parts = units.split('.');
        let whole = parts.next()?.parse::<u128>().ok()?;
        let fraction = if let Some(frac_str) = parts.next() {
            if parts.next().is_some() {
                return None; // More than one decimal point is invalid
            }
            if frac_str.is_empty() || frac_str.len() > DECIMALS || !frac_str.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let mut padded_frac = frac_str.to_string();
            while padded_frac.len() < DECIMALS {
                padded_frac.push('0');
            }
            padded_frac.parse::<u128>().ok()?
        } else {
            0
        };
        let amount = whole.checked_mul(BASE_UNITS_PER_UNIT)?.checked_add(fraction)?;
        Some(Amount { amount })
    }

    /// Splits the amount into (whole units, fractional base units).
    pub fn to_units_parts(&self) -> (u128, u128) {
        (self.amount / BASE_UNITS_PER_UNIT, self.amount % BASE_UNITS_PER_UNIT)
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.amount.checked_add(other.amount).map(Amount::from_base_units)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.amount.checked_sub(other.amount).map(Amount::from_base_units)
    }
}

impl From<u128> for Amount {
    fn from(amount: u128) -> Self {
        Amount::from_base_units(amount)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (whole, fraction) = self.to_units_parts();
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let frac = format!("{fraction:018}");
        write!(f, "{whole}.{}", frac.trim_end_matches('0'))
    }
}
