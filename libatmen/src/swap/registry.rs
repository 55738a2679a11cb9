use crate::address::Address;
use crate::amount::Amount;
use crate::cryptography::{verify_reveal, CommitmentId, Secret};
use crate::helpers::Timestamp;
use crate::host::{AssetLedger, Clock};
use crate::operation::{Authorization, Operation, OperationError, OperationValidator, SwapLookup};
use crate::swap::config::RegistryConfig;
use crate::swap::error::SwapError;
use crate::swap::events::SwapEvent;
use crate::swap::record::{CallContext, OpenRequest, Swap, SwapState};
use log::*;
use std::collections::HashMap;

/// Holds every open swap, keyed by commitment id, and moves escrowed value through the host ledger.
///
/// Each operation either completes fully (record written, value moved, event emitted) or fails with nothing changed.
/// At most one swap is live per commitment id. Closed and expired swaps are removed, so an id can be reused once its
/// swap has finished.
pub struct SwapRegistry<L, C> {
    config: RegistryConfig,
    swaps: HashMap<CommitmentId, Swap>,
    events: Vec<SwapEvent>,
    validator: OperationValidator,
    ledger: L,
    clock: C,
}

impl<L: AssetLedger, C: Clock> SwapRegistry<L, C> {
    pub fn new(config: RegistryConfig, ledger: L, clock: C) -> Self {
        Self { config, swaps: HashMap::new(), events: Vec::new(), validator: OperationValidator::new(), ledger, clock }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    /// The live swap at `id`, if any.
    pub fn commitment(&self, id: &CommitmentId) -> Option<&Swap> {
        self.swaps.get(id)
    }

    pub fn timelock_of(&self, id: &CommitmentId) -> Option<Timestamp> {
        self.swaps.get(id).map(|s| s.timelock)
    }

    pub fn open_swaps(&self) -> impl Iterator<Item = &Swap> {
        self.swaps.values()
    }

    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// Escrows `request.value` from the caller and records a new swap.
    ///
    /// Native swaps must attach exactly `request.value`. Token swaps attach nothing and are pulled from the caller's
    /// allowance to the registry's custody account.
    pub fn open(&mut self, call: CallContext, request: OpenRequest) -> Result<&Swap, SwapError> {
        let expected_attachment = if request.asset.is_native() { request.value } else { Amount::ZERO };
        if request.value <= self.config.minimum_value || call.attached != expected_attachment {
            return Err(SwapError::InvalidValue {
                value: request.value,
                minimum: self.config.minimum_value,
                attached: call.attached,
            });
        }
        let now = self.clock.now();
        if request.timelock <= now {
            return Err(SwapError::InvalidTimelock { timelock: request.timelock, now });
        }
        if request.recipient.is_zero() {
            return Err(SwapError::InvalidRecipient);
        }
        if self.swaps.contains_key(&request.id) {
            return Err(SwapError::AlreadyOpen(request.id));
        }
        self.ledger.escrow(&call.caller, &request.asset, request.value)?;
        let id = request.id;
        let swap = Swap {
            id,
            asset: request.asset,
            value: request.value,
            timelock: request.timelock,
            recipient: request.recipient,
            opener: call.caller,
            state: SwapState::Open,
        };
        info!(
            "Swap {id} opened by {} for {} ({}), locked until {}",
            swap.opener, swap.value, swap.asset, swap.timelock
        );
        self.events.push(SwapEvent::Open(id));
        Ok(self.swaps.entry(id).or_insert(swap))
    }

    /// Pays the swap at `id` to its recipient. Anyone holding the secret may call this, until the timelock.
    pub fn close(&mut self, id: &CommitmentId, secret: &Secret) -> Result<Swap, SwapError> {
        let swap = self.swaps.get(id).ok_or(SwapError::NotFound(*id))?;
        if !verify_reveal(id, secret) {
            return Err(SwapError::InvalidSecret(*id));
        }
        if self.clock.now() >= swap.timelock {
            return Err(SwapError::Expired { id: *id, timelock: swap.timelock });
        }
        let swap = self.settle(id, SwapState::Closed)?;
        info!("Swap {id} closed. {} ({}) paid to {}", swap.value, swap.asset, swap.recipient);
        self.events.push(SwapEvent::Close(*id));
        Ok(swap)
    }

    /// Refunds the swap at `id` to its opener. Anyone may call this once the timelock has been reached.
    pub fn expire(&mut self, id: &CommitmentId) -> Result<Swap, SwapError> {
        let swap = self.swaps.get(id).ok_or(SwapError::NotFound(*id))?;
        if self.clock.now() < swap.timelock {
            return Err(SwapError::NotYetExpired { id: *id, timelock: swap.timelock });
        }
        let swap = self.settle(id, SwapState::Expired)?;
        info!("Swap {id} expired. {} ({}) refunded to {}", swap.value, swap.asset, swap.opener);
        self.events.push(SwapEvent::Expire(*id));
        Ok(swap)
    }

    /// Whether `op` would be sponsored. See [`OperationValidator`].
    pub fn validate(&self, op: &Operation) -> Result<bool, OperationError> {
        self.validator.validate(op, self)
    }

    /// Validates a relayed operation and, if it is authorized, closes the swap it reveals.
    pub fn execute(&mut self, op: &Operation) -> Result<Swap, SwapError> {
        match self.validator.check(op, &*self)? {
            Authorization::Granted { id, secret } => self.close(&id, &secret),
            Authorization::Denied(reason) => {
                warn!("Rejected operation from {} (nonce {}): {reason}", op.sender, op.nonce);
                Err(SwapError::Unauthorized(reason))
            }
        }
    }

    /// Removes the record and releases its value to the payee for `state`. The record is restored if the release
    /// fails.
    fn settle(&mut self, id: &CommitmentId, state: SwapState) -> Result<Swap, SwapError> {
        let Some(mut swap) = self.swaps.remove(id) else {
            return Err(SwapError::NotFound(*id));
        };
        swap.state = state;
        let payee: Address = match state {
            SwapState::Closed => swap.recipient,
            _ => swap.opener,
        };
        if let Err(e) = self.ledger.release(&payee, &swap.asset, swap.value) {
            warn!("Could not release {} ({}) from swap {id} to {payee}: {e}", swap.value, swap.asset);
            swap.state = SwapState::Open;
            self.swaps.insert(*id, swap);
            return Err(e.into());
        }
        Ok(swap)
    }
}

impl<L: AssetLedger, C: Clock> SwapLookup for SwapRegistry<L, C> {
    fn open_swap_timelock(&self, id: &CommitmentId) -> Option<Timestamp> {
        self.timelock_of(id)
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cryptography::{commitment_id_from_secret, CurveError};
    use crate::host::{Asset, InMemoryLedger, LedgerError, ManualClock};
    use std::time::Duration;

    const CUSTODY: Address = Address::new([0xcc; 20]);
    const ALICE: Address = Address::new([0xaa; 20]);
    const BOB: Address = Address::new([0xbb; 20]);
    const START: Timestamp = Timestamp::new(1_700_000_000);

    fn value() -> Amount {
        Amount::from_units("1.5").unwrap()
    }

    fn registry() -> SwapRegistry<InMemoryLedger, ManualClock> {
        let mut ledger = InMemoryLedger::new(CUSTODY);
        ledger.credit_native(ALICE, Amount::from_units("10").unwrap()).unwrap();
        SwapRegistry::new(RegistryConfig::default(), ledger, ManualClock::new(START))
    }

    fn request(id: CommitmentId) -> OpenRequest {
        OpenRequest::native(id, value(), START.saturating_add(Duration::from_secs(3600)), BOB)
    }

    const QX: &str = "3ea9f9f1994da291a91e81b52819e4602c669b05e01f29ace4efba684929e3c2";
    const QY: &str = "9e5b27cc7c5ecd0d93b0bd04a483952b7adeb9fc2f5d027b144c477cb4d73ccb";

    fn secret() -> Secret {
        Secret::from_hex("1787f38d854231dfec2b27a0f621414d10bfa95970b3e576aed29e1e8287e51e").unwrap()
    }

    #[test]
    fn open_rejects_values_at_or_below_minimum() {
        let mut registry = registry();
        let id = commitment_id_from_secret(&secret()).unwrap();
        let minimum = registry.config().minimum_value;
        let mut req = request(id);
        req.value = minimum;
        let err = registry.open(CallContext::with_value(ALICE, minimum), req).unwrap_err();
        assert!(matches!(err, SwapError::InvalidValue { .. }));
        let mut req = request(id);
        req.value = Amount::from_base_units(minimum.to_base_units() + 1);
        assert!(registry.open(CallContext::with_value(ALICE, req.value), req).is_ok());
    }

    #[test]
    fn custom_minimum_value_is_enforced() {
        let minimum = Amount::from_units("2").unwrap();
        let config = RegistryConfig::with_minimum_value(minimum);
        let mut ledger = InMemoryLedger::new(CUSTODY);
        ledger.credit_native(ALICE, Amount::from_units("10").unwrap()).unwrap();
        let mut registry = SwapRegistry::new(config, ledger, ManualClock::new(START));
        assert_eq!(registry.config().minimum_value, minimum);

        let id = commitment_id_from_secret(&secret()).unwrap();
        // 1.5 clears the default minimum but not this one
        let err = registry.open(CallContext::with_value(ALICE, value()), request(id)).unwrap_err();
        assert_eq!(err, SwapError::InvalidValue { value: value(), minimum, attached: value() });

        let mut req = request(id);
        req.value = Amount::from_units("2.000001").unwrap();
        registry.open(CallContext::with_value(ALICE, req.value), req).unwrap();
        assert_eq!(registry.ledger().balance(&Asset::Native, &CUSTODY), Amount::from_units("2.000001").unwrap());
    }

    #[test]
    fn open_from_a_commitment_point() {
        let mut registry = registry();
        let x = crate::helpers::decode_hex_array(QX).unwrap();
        let y = crate::helpers::decode_hex_array(QY).unwrap();
        let timelock = START.saturating_add(Duration::from_secs(3600));
        let req = OpenRequest::from_point(&x, &y, Asset::Native, value(), timelock, BOB).unwrap();
        assert_eq!(req.id.to_string(), "0xb3dca5f0cab69500d9165dd025c3a7ff82dca55f");
        assert_eq!(req.id, commitment_id_from_secret(&secret()).unwrap());

        registry.open(CallContext::with_value(ALICE, value()), req).unwrap();
        let swap = registry.close(&commitment_id_from_secret(&secret()).unwrap(), &secret()).unwrap();
        assert_eq!(swap.recipient, BOB);
    }

    #[test]
    fn off_curve_points_escrow_nothing() {
        let registry = registry();
        let x = crate::helpers::decode_hex_array(QX).unwrap();
        let mut y: [u8; 32] = crate::helpers::decode_hex_array(QY).unwrap();
        y[31] ^= 1;
        let timelock = START.saturating_add(Duration::from_secs(3600));
        let err = OpenRequest::from_point(&x, &y, Asset::Native, value(), timelock, BOB).unwrap_err();
        assert_eq!(err, SwapError::InvalidPoint(CurveError::InvalidPoint));
        let err = OpenRequest::from_point(&[0u8; 32], &[0u8; 32], Asset::Native, value(), timelock, BOB).unwrap_err();
        assert_eq!(err, SwapError::InvalidPoint(CurveError::InvalidPoint));
        assert!(registry.is_empty());
        assert!(registry.events().is_empty());
        assert_eq!(registry.ledger().balance(&Asset::Native, &ALICE), Amount::from_units("10").unwrap());
        assert_eq!(registry.ledger().balance(&Asset::Native, &CUSTODY), Amount::ZERO);
    }

    #[test]
    fn open_requires_matching_attachment() {
        let mut registry = registry();
        let id = commitment_id_from_secret(&secret()).unwrap();
        let err = registry.open(CallContext::new(ALICE), request(id)).unwrap_err();
        assert!(matches!(err, SwapError::InvalidValue { .. }));
        assert!(registry.is_empty());
        assert!(registry.events().is_empty());
    }

    #[test]
    fn open_checks_timelock_then_recipient_then_duplicates() {
        let mut registry = registry();
        let id = commitment_id_from_secret(&secret()).unwrap();
        let call = CallContext::with_value(ALICE, value());

        let mut req = request(id);
        req.timelock = START;
        assert_eq!(registry.open(call, req).unwrap_err(), SwapError::InvalidTimelock { timelock: START, now: START });

        let mut req = request(id);
        req.recipient = Address::ZERO;
        assert_eq!(registry.open(call, req).unwrap_err(), SwapError::InvalidRecipient);

        registry.open(call, request(id)).unwrap();
        assert_eq!(registry.open(call, request(id)).unwrap_err(), SwapError::AlreadyOpen(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn open_fails_cleanly_without_funds() {
        let mut registry = registry();
        let id = commitment_id_from_secret(&secret()).unwrap();
        let mut req = request(id);
        req.value = Amount::from_units("11").unwrap();
        let err = registry.open(CallContext::with_value(ALICE, req.value), req).unwrap_err();
        assert!(matches!(err, SwapError::Transfer(LedgerError::InsufficientFunds { .. })));
        assert!(registry.commitment(&id).is_none());
        assert!(registry.events().is_empty());
    }

    #[test]
    fn close_checks_existence_then_secret_then_time() {
        let mut registry = registry();
        let id = commitment_id_from_secret(&secret()).unwrap();
        assert_eq!(registry.close(&id, &secret()).unwrap_err(), SwapError::NotFound(id));
        registry.open(CallContext::with_value(ALICE, value()), request(id)).unwrap();

        let wrong = Secret::from_bytes(&[0x01; 32]).unwrap();
        assert_eq!(registry.close(&id, &wrong).unwrap_err(), SwapError::InvalidSecret(id));

        let timelock = registry.timelock_of(&id).unwrap();
        registry.clock().set(timelock);
        assert_eq!(registry.close(&id, &secret()).unwrap_err(), SwapError::Expired { id, timelock });
        assert!(registry.commitment(&id).is_some());
    }

    #[test]
    fn failed_release_restores_the_swap() {
        let mut registry = registry();
        let id = commitment_id_from_secret(&secret()).unwrap();
        registry.open(CallContext::with_value(ALICE, value()), request(id)).unwrap();
        // Drain custody behind the registry's back
        registry.ledger_mut().release(&ALICE, &Asset::Native, value()).unwrap();
        let err = registry.close(&id, &secret()).unwrap_err();
        assert!(matches!(err, SwapError::Transfer(_)));
        let swap = registry.commitment(&id).unwrap();
        assert!(swap.is_open());
        assert_eq!(registry.events(), &[SwapEvent::Open(id)]);
    }
}
