use crate::address::Address;
use crate::amount::Amount;
use crate::helpers::Timestamp;
use crate::host::{InMemoryLedger, ManualClock};
use crate::swap::{RegistryConfig, SwapRegistry};
use std::time::Duration;

pub const CUSTODY: Address = Address::new([0xcc; 20]);
pub const ALICE: Address = Address::new([0xaa; 20]);
pub const BOB: Address = Address::new([0xbb; 20]);
pub const RELAYER: Address = Address::new([0xee; 20]);
pub const TOKEN: Address = Address::new([0x70; 20]);
pub const START: Timestamp = Timestamp::new(1_700_000_000);
pub const ONE_HOUR: Duration = Duration::from_secs(3600);

pub type TestRegistry = SwapRegistry<InMemoryLedger, ManualClock>;

pub fn units(s: &str) -> Amount {
    Amount::from_units(s).unwrap()
}

/// A registry whose clock starts at [`START`], with Alice and Bob funded with 100 native units each.
pub fn funded_registry() -> TestRegistry {
    env_logger::try_init().ok();
    let mut ledger = InMemoryLedger::new(CUSTODY);
    ledger.credit_native(ALICE, units("100")).unwrap();
    ledger.credit_native(BOB, units("100")).unwrap();
    SwapRegistry::new(RegistryConfig::default(), ledger, ManualClock::new(START))
}

pub fn in_an_hour() -> Timestamp {
    START.saturating_add(ONE_HOUR)
}
