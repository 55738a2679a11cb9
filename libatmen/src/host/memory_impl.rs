use crate::address::Address;
use crate::amount::Amount;
use crate::helpers::Timestamp;
use crate::host::error::LedgerError;
use crate::host::traits::{Asset, AssetLedger, Clock};
use log::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::time::Duration;

/// An in-memory ledger with native balances, token balances and token allowances.
///
/// Allowances are always granted to the custody account, which is the only spender this ledger knows about.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    custody: Address,
    native: HashMap<Address, Amount>,
    tokens: HashMap<(Address, Address), Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl InMemoryLedger {
    /// Creates an empty ledger whose escrowed funds are held by `custody`.
    pub fn new(custody: Address) -> Self {
        Self { custody, ..Default::default() }
    }

    pub fn custody(&self) -> &Address {
        &self.custody
    }

    pub fn credit_native(&mut self, holder: Address, value: Amount) -> Result<(), LedgerError> {
        credit(&mut self.native, holder, value)
    }

    pub fn credit_token(&mut self, token: Address, holder: Address, value: Amount) -> Result<(), LedgerError> {
        credit(&mut self.tokens, (token, holder), value)
    }

    /// Sets the amount of `token` the custody account may pull from `owner`.
    pub fn approve(&mut self, token: Address, owner: Address, value: Amount) {
        self.allowances.insert((token, owner), value);
    }

    pub fn balance(&self, asset: &Asset, holder: &Address) -> Amount {
        match asset {
            Asset::Native => self.native.get(holder).copied().unwrap_or_default(),
            Asset::Token(token) => self.tokens.get(&(*token, *holder)).copied().unwrap_or_default(),
        }
    }

    pub fn allowance(&self, token: &Address, owner: &Address) -> Amount {
        self.allowances.get(&(*token, *owner)).copied().unwrap_or_default()
    }

    fn transfer(&mut self, asset: &Asset, from: &Address, to: &Address, value: Amount) -> Result<(), LedgerError> {
        let available = self.balance(asset, from);
        let remaining = available.checked_sub(value).ok_or(LedgerError::InsufficientFunds {
            holder: *from,
            needed: value,
            available,
        })?;
        let receiving = if from == to { remaining } else { self.balance(asset, to) };
        let received = receiving.checked_add(value).ok_or(LedgerError::Overflow)?;
        match asset {
            Asset::Native => {
                self.native.insert(*from, remaining);
                self.native.insert(*to, received);
            }
            Asset::Token(token) => {
                self.tokens.insert((*token, *from), remaining);
                self.tokens.insert((*token, *to), received);
            }
        }
        Ok(())
    }
}

fn credit<K: std::hash::Hash + Eq>(map: &mut HashMap<K, Amount>, key: K, value: Amount) -> Result<(), LedgerError> {
    let balance = map.entry(key).or_default();
    *balance = balance.checked_add(value).ok_or(LedgerError::Overflow)?;
    Ok(())
}

impl AssetLedger for InMemoryLedger {
    fn escrow(&mut self, from: &Address, asset: &Asset, value: Amount) -> Result<(), LedgerError> {
        let custody = self.custody;
        if let Asset::Token(token) = asset {
            let approved = self.allowance(token, from);
            let left = approved.checked_sub(value).ok_or(LedgerError::InsufficientAllowance {
                token: *token,
                owner: *from,
                needed: value,
                approved,
            })?;
            self.transfer(asset, from, &custody, value)?;
            self.allowances.insert((*token, *from), left);
        } else {
            self.transfer(asset, from, &custody, value)?;
        }
        debug!("Escrowed {value} ({asset}) from {from}");
        Ok(())
    }

    fn release(&mut self, to: &Address, asset: &Asset, value: Amount) -> Result<(), LedgerError> {
        let custody = self.custody;
        self.transfer(asset, &custody, to, value)?;
        debug!("Released {value} ({asset}) to {to}");
        Ok(())
    }
}

/// Reads the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { now: Cell::new(start.as_secs()) }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get().saturating_add(duration.as_secs()));
    }

    /// Moves the clock to `time`. Requests to move backwards are ignored.
    pub fn set(&self, time: Timestamp) {
        if time.as_secs() < self.now.get() {
            warn!("Ignoring request to move the clock back from {} to {time}", self.now());
            return;
        }
        self.now.set(time.as_secs());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTODY: Address = Address::new([0xcc; 20]);
    const ALICE: Address = Address::new([0xaa; 20]);
    const BOB: Address = Address::new([0xbb; 20]);
    const TOKEN: Address = Address::new([0x70; 20]);

    fn amt(v: u128) -> Amount {
        Amount::from_base_units(v)
    }

    #[test]
    fn native_escrow_and_release() {
        let mut ledger = InMemoryLedger::new(CUSTODY);
        ledger.credit_native(ALICE, amt(100)).unwrap();
        ledger.escrow(&ALICE, &Asset::Native, amt(60)).unwrap();
        assert_eq!(ledger.balance(&Asset::Native, &ALICE), amt(40));
        assert_eq!(ledger.balance(&Asset::Native, &CUSTODY), amt(60));
        ledger.release(&BOB, &Asset::Native, amt(60)).unwrap();
        assert_eq!(ledger.balance(&Asset::Native, &BOB), amt(60));
        assert_eq!(ledger.balance(&Asset::Native, &CUSTODY), amt(0));
    }

    #[test]
    fn escrow_fails_without_funds_and_moves_nothing() {
        let mut ledger = InMemoryLedger::new(CUSTODY);
        ledger.credit_native(ALICE, amt(10)).unwrap();
        let err = ledger.escrow(&ALICE, &Asset::Native, amt(11)).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientFunds { holder: ALICE, needed: amt(11), available: amt(10) });
        assert_eq!(ledger.balance(&Asset::Native, &ALICE), amt(10));
        assert_eq!(ledger.balance(&Asset::Native, &CUSTODY), amt(0));
    }

    #[test]
    fn token_escrow_consumes_allowance() {
        let token = Asset::Token(TOKEN);
        let mut ledger = InMemoryLedger::new(CUSTODY);
        ledger.credit_token(TOKEN, ALICE, amt(500)).unwrap();
        let err = ledger.escrow(&ALICE, &token, amt(100)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));

        ledger.approve(TOKEN, ALICE, amt(150));
        ledger.escrow(&ALICE, &token, amt(100)).unwrap();
        assert_eq!(ledger.allowance(&TOKEN, &ALICE), amt(50));
        assert_eq!(ledger.balance(&token, &ALICE), amt(400));
        assert_eq!(ledger.balance(&token, &CUSTODY), amt(100));
        // Token balances and native balances are separate books
        assert_eq!(ledger.balance(&Asset::Native, &CUSTODY), amt(0));
    }

    #[test]
    fn token_escrow_without_balance_keeps_allowance() {
        let token = Asset::Token(TOKEN);
        let mut ledger = InMemoryLedger::new(CUSTODY);
        ledger.approve(TOKEN, ALICE, amt(150));
        assert!(ledger.escrow(&ALICE, &token, amt(100)).is_err());
        assert_eq!(ledger.allowance(&TOKEN, &ALICE), amt(150));
    }

    #[test]
    fn release_from_empty_custody_fails() {
        let mut ledger = InMemoryLedger::new(CUSTODY);
        assert!(ledger.release(&BOB, &Asset::Native, amt(1)).is_err());
    }

    #[test]
    fn system_clock_reads_wall_time() {
        let before = Timestamp::now();
        let now = SystemClock.now();
        assert!(now >= before);
        assert!(now <= Timestamp::now());
    }

    #[test]
    fn manual_clock_never_goes_back() {
        let clock = ManualClock::new(Timestamp::new(1_000));
        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), Timestamp::new(1_010));
        clock.set(Timestamp::new(500));
        assert_eq!(clock.now(), Timestamp::new(1_010));
        clock.set(Timestamp::new(2_000));
        assert_eq!(clock.now(), Timestamp::new(2_000));
    }
}
