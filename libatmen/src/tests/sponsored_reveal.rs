//! A recipient with no native funds hands their reveal to a relayer, who submits it as a sponsored operation.

use super::common::*;
use crate::cryptography::{commitment_id_from_secret, Secret};
use crate::host::Asset;
use crate::operation::{encode_reveal, DenialReason, Operation, OperationError};
use crate::swap::{CallContext, OpenRequest, SwapError, SwapEvent};
use rand_core::OsRng;

fn open_swap(registry: &mut TestRegistry) -> (Secret, crate::cryptography::CommitmentId) {
    let secret = Secret::random(&mut OsRng);
    let id = commitment_id_from_secret(&secret).unwrap();
    let value = units("4");
    registry.open(CallContext::with_value(ALICE, value), OpenRequest::native(id, value, in_an_hour(), BOB)).unwrap();
    (secret, id)
}

#[test]
fn relayed_reveal_closes_the_swap() {
    let mut registry = funded_registry();
    let (secret, id) = open_swap(&mut registry);
    let op = Operation::new(RELAYER, 0, encode_reveal(&id, &secret));
    assert!(registry.validate(&op).unwrap());

    let closed = registry.execute(&op).unwrap();
    assert_eq!(closed.id, id);
    // The relayer submits, the recipient is paid
    assert_eq!(registry.ledger().balance(&Asset::Native, &BOB), units("104"));
    assert_eq!(registry.ledger().balance(&Asset::Native, &RELAYER), units("0"));
    assert_eq!(registry.events().last(), Some(&SwapEvent::Close(id)));

    // Once closed, the same operation is no longer sponsored
    assert!(!registry.validate(&op).unwrap());
    assert_eq!(registry.execute(&op).unwrap_err(), SwapError::Unauthorized(DenialReason::NoOpenSwap(id)));
}

#[test]
fn relayed_reveal_with_wrong_secret_is_unauthorized() {
    let mut registry = funded_registry();
    let (_, id) = open_swap(&mut registry);
    let op = Operation::new(RELAYER, 0, encode_reveal(&id, &Secret::random(&mut OsRng)));
    assert!(!registry.validate(&op).unwrap());
    assert_eq!(registry.execute(&op).unwrap_err(), SwapError::Unauthorized(DenialReason::SecretMismatch(id)));
    assert!(registry.commitment(&id).is_some());
}

#[test]
fn relayed_reveal_with_fees_is_unauthorized() {
    let mut registry = funded_registry();
    let (secret, id) = open_swap(&mut registry);
    let op = Operation::new(RELAYER, 0, encode_reveal(&id, &secret)).with_fees(1_000_000_000, 0);
    assert!(!registry.validate(&op).unwrap());
    assert_eq!(registry.execute(&op).unwrap_err(), SwapError::Unauthorized(DenialReason::FeesDeclared));
}

#[test]
fn relayed_reveal_after_timelock_is_unauthorized() {
    let mut registry = funded_registry();
    let (secret, id) = open_swap(&mut registry);
    registry.clock().advance(ONE_HOUR);
    let op = Operation::new(RELAYER, 0, encode_reveal(&id, &secret));
    assert!(!registry.validate(&op).unwrap());
    registry.expire(&id).unwrap();
}

#[test]
fn malformed_operations_are_errors() {
    let mut registry = funded_registry();
    let (secret, id) = open_swap(&mut registry);
    let mut data = encode_reveal(&id, &secret);
    data.pop();
    let op = Operation::new(RELAYER, 0, data);
    assert!(matches!(registry.validate(&op), Err(OperationError::MalformedOperation(_))));
    assert!(matches!(registry.execute(&op), Err(SwapError::Operation(OperationError::MalformedOperation(_)))));
    assert!(registry.commitment(&id).is_some());
}
